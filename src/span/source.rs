use super::{Pos, Span};

/// Read access to the text a token stream was produced from.
///
/// The parser never owns the buffer; it asks the provider for the literal
/// text of a range whenever it needs to look at a lexeme (operator spelling,
/// keyword, string quoting, line breaks between tokens).
pub trait TextProvider {
    fn len(&self) -> usize;

    /// Text covered by `span`. Out of range or non char-aligned spans yield `""`.
    fn text(&self, span: Span) -> &str;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn full_text(&self) -> &str {
        self.text(Span::new(0, self.len()))
    }
}

impl TextProvider for str {
    fn len(&self) -> usize {
        str::len(self)
    }

    fn text(&self, span: Span) -> &str {
        self.get(span.start..span.end).unwrap_or("")
    }
}

impl TextProvider for String {
    fn len(&self) -> usize {
        String::len(self)
    }

    fn text(&self, span: Span) -> &str {
        self.as_str().text(span)
    }
}

/// Maps byte offsets to line/column positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> LineIndex {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn pos(&self, offset: usize) -> Pos {
        let offset = offset.min(self.len);
        let lineno = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Pos {
            lineno,
            col: offset - self.line_starts[lineno],
            offset,
        }
    }

    /// The text of line `lineno` without its terminator.
    pub fn line<'a>(&self, text: &'a str, lineno: usize) -> &'a str {
        let start = match self.line_starts.get(lineno) {
            Some(start) => *start,
            None => return "",
        };
        let end = self
            .line_starts
            .get(lineno + 1)
            .map(|next| next - 1)
            .unwrap_or(self.len);
        text.get(start..end)
            .unwrap_or("")
            .trim_end_matches('\r')
    }
}

#[cfg(test)]
mod source_tests {
    use super::{LineIndex, TextProvider};
    use crate::span::Span;

    #[test]
    fn text_provider_is_total() {
        let text = "x <- 1";
        assert_eq!(text.text(Span::new(0, 1)), "x");
        assert_eq!(text.text(Span::new(4, 40)), "");
        assert_eq!(text.full_text(), "x <- 1");
    }

    #[test]
    fn line_index_positions() {
        let text = "a <- 1\nb <- 2\n\nc";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);
        let pos = index.pos(7);
        assert_eq!((pos.lineno, pos.col), (1, 0));
        let pos = index.pos(15);
        assert_eq!((pos.lineno, pos.col), (3, 0));
        // one past the last character still maps onto the last line
        let pos = index.pos(16);
        assert_eq!((pos.lineno, pos.col), (3, 1));
        assert_eq!(index.line(text, 1), "b <- 2");
        assert_eq!(index.line(text, 2), "");
        assert_eq!(index.line(text, 9), "");
    }
}
