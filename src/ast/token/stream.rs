use serde::Serialize;

use crate::{
    ast::token::{Token, TokenKind},
    span::{source::TextProvider, Span},
};

/// An owned, immutable token sequence that always ends in an
/// `EndOfStream` sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    /// Builds a list from tokens produced by any tokenizer. Comment tokens
    /// are dropped and a sentinel is appended when missing.
    pub fn new(mut tokens: Vec<Token>) -> TokenList {
        tokens.retain(|t| t.kind != TokenKind::Comment);
        if let Some(pos) = tokens.iter().position(|t| t.is_end_of_stream()) {
            tokens.truncate(pos + 1);
        } else {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::end_of_stream(end));
        }
        TokenList { tokens }
    }

    /// Number of real tokens, not counting the sentinel.
    pub fn len(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the sentinel for any index past the end.
    pub fn get(&self, index: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    pub fn end_of_stream(&self) -> &Token {
        self.get(self.tokens.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens[..self.len()].iter()
    }

    pub fn stream(&self) -> TokenStream<'_> {
        TokenStream {
            tokens: &self.tokens,
            position: 0,
        }
    }
}

impl From<Vec<Token>> for TokenList {
    fn from(tokens: Vec<Token>) -> TokenList {
        TokenList::new(tokens)
    }
}

/// A cursor over a `TokenList`.
///
/// Moving past the last real token parks the cursor on the sentinel;
/// `current` never fails.
#[derive(Clone, Debug)]
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> TokenStream<'a> {
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.position]
    }

    pub fn peek(&self, n: usize) -> &'a Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + n).min(last)]
    }

    pub fn next_token(&self) -> &'a Token {
        self.peek(1)
    }

    pub fn previous(&self) -> Option<&'a Token> {
        if self.position == 0 {
            None
        } else {
            Some(&self.tokens[self.position - 1])
        }
    }

    /// Consumes the current token and returns it.
    pub fn advance(&mut self) -> Token {
        let tok = *self.current();
        if !tok.is_end_of_stream() {
            self.position += 1;
        }
        tok
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn move_to(&mut self, position: usize) {
        self.position = position.min(self.tokens.len() - 1);
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.current().is_end_of_stream()
    }

    /// Whether the text between the previous token and the current one
    /// contains a line break. The sentinel always sits on a fresh line.
    pub fn is_line_break_before<T: TextProvider + ?Sized>(&self, text: &T) -> bool {
        let prev = match self.previous() {
            Some(prev) => prev,
            None => return false,
        };
        let curr = self.current();
        if curr.is_end_of_stream() {
            return true;
        }
        if prev.span.end > curr.span.start {
            return false;
        }
        text.text(Span::new(prev.span.end, curr.span.start))
            .contains(|c| c == '\n' || c == '\r')
    }
}
