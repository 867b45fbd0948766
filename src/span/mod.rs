use std::fmt;

use serde::Serialize;

pub mod source;

/// A resolved location inside a text buffer. `lineno` and `col` are zero based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Pos {
    pub lineno: usize,
    pub col: usize,
    pub offset: usize,
}

/// Half-open byte range `[start, end)` over the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Span {
        debug_assert!(start <= end, "span start {} is past its end {}", start, end);
        Span { start, end }
    }

    /// A zero-width span sitting at `offset`.
    pub fn empty_at(offset: usize) -> Span {
        Span {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a new span with the start of this one and end of another one
    pub fn extend_to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.start),
        }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The zero-width span right after this one.
    pub fn after(&self) -> Span {
        Span::empty_at(self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.lineno + 1, self.col + 1)
    }
}

#[cfg(test)]
mod span_tests {
    use super::Span;

    #[test]
    fn extend_to_keeps_start() {
        let a = Span::new(2, 4);
        let b = Span::new(6, 9);
        assert_eq!(a.extend_to(&b), Span::new(2, 9));
        assert!(a.extend_to(&b).contains_span(&b));
    }

    #[test]
    fn contains_is_half_open() {
        let s = Span::new(3, 5);
        assert!(!s.contains(2));
        assert!(s.contains(3));
        assert!(s.contains(4));
        assert!(!s.contains(5));
        assert!(!Span::empty_at(3).contains(3));
    }
}
