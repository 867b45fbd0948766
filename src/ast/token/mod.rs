use std::fmt;

use fnv::FnvHashMap;
use serde::Serialize;

use crate::span::Span;

mod stream;

pub use stream::{TokenList, TokenStream};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    Complex,
    String,
    Logical,
    Null,
    Missing,
    Infinity,
    NaN,
    Ellipsis,
    Operator,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,
    OpenDoubleBracket,
    CloseDoubleBracket,
    Comma,
    Semicolon,
    Comment,
    Unknown,
    EndOfStream,
}

impl TokenKind {
    pub fn desc(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::Number => "number",
            TokenKind::Complex => "complex",
            TokenKind::String => "string",
            TokenKind::Logical => "logical",
            TokenKind::Null => "NULL",
            TokenKind::Missing => "NA",
            TokenKind::Infinity => "Inf",
            TokenKind::NaN => "NaN",
            TokenKind::Ellipsis => "...",
            TokenKind::Operator => "operator",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenDoubleBracket => "[[",
            TokenKind::CloseDoubleBracket => "]]",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Comment => "comment",
            TokenKind::Unknown => "unknown",
            TokenKind::EndOfStream => "end of stream",
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number
                | TokenKind::Complex
                | TokenKind::String
                | TokenKind::Logical
                | TokenKind::Null
                | TokenKind::Missing
                | TokenKind::Infinity
                | TokenKind::NaN
        )
    }

    pub fn is_close(&self) -> bool {
        matches!(
            self,
            TokenKind::CloseParen
                | TokenKind::CloseCurly
                | TokenKind::CloseBracket
                | TokenKind::CloseDoubleBracket
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.desc())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Token {
        Token { kind, span }
    }

    pub fn end_of_stream(offset: usize) -> Token {
        Token {
            kind: TokenKind::EndOfStream,
            span: Span::empty_at(offset),
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.kind == TokenKind::EndOfStream
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.span)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    If,
    Else,
    Repeat,
    While,
    Function,
    For,
    In,
    Next,
    Break,
    Return,
    Typeof,
    Library,
    Require,
}

lazy_static! {
    static ref KEYWORDS: FnvHashMap<&'static str, Keyword> = {
        let mut m = FnvHashMap::default();
        m.insert("if", Keyword::If);
        m.insert("else", Keyword::Else);
        m.insert("repeat", Keyword::Repeat);
        m.insert("while", Keyword::While);
        m.insert("function", Keyword::Function);
        m.insert("\\", Keyword::Function);
        m.insert("for", Keyword::For);
        m.insert("in", Keyword::In);
        m.insert("next", Keyword::Next);
        m.insert("break", Keyword::Break);
        m.insert("return", Keyword::Return);
        m.insert("typeof", Keyword::Typeof);
        m.insert("library", Keyword::Library);
        m.insert("require", Keyword::Require);
        m
    };
}

impl Keyword {
    pub fn from_lexeme(s: &str) -> Option<Keyword> {
        KEYWORDS.get(s).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Repeat => "repeat",
            Keyword::While => "while",
            Keyword::Function => "function",
            Keyword::For => "for",
            Keyword::In => "in",
            Keyword::Next => "next",
            Keyword::Break => "break",
            Keyword::Return => "return",
            Keyword::Typeof => "typeof",
            Keyword::Library => "library",
            Keyword::Require => "require",
        }
    }

    /// Keywords that read like an ordinary call, `library(x)`.
    pub fn is_call_like(&self) -> bool {
        matches!(
            self,
            Keyword::Return | Keyword::Typeof | Keyword::Library | Keyword::Require
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Checks the quoting of a string lexeme: `"..."`, `'...'` or a raw
/// string such as `r"(...)"` / `R'--[...]--'`.
pub fn is_terminated_string(text: &str) -> bool {
    let mut chars = text.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };

    if first == 'r' || first == 'R' {
        let rest = &text[1..];
        let quote = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => return false,
        };
        let body = &rest[1..];
        let dashes = body.chars().take_while(|c| *c == '-').count();
        let close = match body[dashes..].chars().next() {
            Some('(') => ')',
            Some('[') => ']',
            Some('{') => '}',
            _ => return false,
        };
        let terminator = format!("{}{}{}", close, "-".repeat(dashes), quote);
        let opener_len = 1 + 1 + dashes + 1;
        return text.len() >= opener_len + terminator.len() && text.ends_with(&terminator);
    }

    if first != '"' && first != '\'' {
        return false;
    }

    let mut escaped = false;
    for (i, c) in text[first.len_utf8()..].char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == first {
            return i + first.len_utf8() + c.len_utf8() == text.len();
        }
    }
    false
}
