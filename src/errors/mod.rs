use crate::span::{source::LineIndex, Span};

use colored::*;
use fnv::FnvHashSet;
use serde::Serialize;
use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum ErrorCategory {
    /// Bracket and block structure is broken.
    Structural,
    /// The tokenizer could not make sense of a lexeme.
    Lexical,
    /// A grammar position wanted something that was not there.
    Expectation,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum ParseErrorKind {
    OpenParenExpected,
    CloseParenExpected,
    OpenCurlyExpected,
    CloseCurlyExpected,
    CloseBracketExpected,
    CloseDoubleBracketExpected,
    UnexpectedEndOfFile,
    NestingTooDeep,
    UnknownToken,
    UnterminatedString,
    UnexpectedToken,
    IdentifierExpected,
    ExpressionExpected,
    LeftOperandExpected,
    RightOperandExpected,
    InKeywordExpected,
    EmptyArgument,
}

impl ParseErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseErrorKind::OpenParenExpected
            | ParseErrorKind::CloseParenExpected
            | ParseErrorKind::OpenCurlyExpected
            | ParseErrorKind::CloseCurlyExpected
            | ParseErrorKind::CloseBracketExpected
            | ParseErrorKind::CloseDoubleBracketExpected
            | ParseErrorKind::UnexpectedEndOfFile
            | ParseErrorKind::NestingTooDeep => ErrorCategory::Structural,
            ParseErrorKind::UnknownToken | ParseErrorKind::UnterminatedString => {
                ErrorCategory::Lexical
            }
            ParseErrorKind::UnexpectedToken
            | ParseErrorKind::IdentifierExpected
            | ParseErrorKind::ExpressionExpected
            | ParseErrorKind::LeftOperandExpected
            | ParseErrorKind::RightOperandExpected
            | ParseErrorKind::InKeywordExpected
            | ParseErrorKind::EmptyArgument => ErrorCategory::Expectation,
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ParseErrorKind::OpenParenExpected => "expected `(`",
                ParseErrorKind::CloseParenExpected => "expected `)`",
                ParseErrorKind::OpenCurlyExpected => "expected `{`",
                ParseErrorKind::CloseCurlyExpected => "expected `}`",
                ParseErrorKind::CloseBracketExpected => "expected `]`",
                ParseErrorKind::CloseDoubleBracketExpected => "expected `]]`",
                ParseErrorKind::UnexpectedEndOfFile => "unexpected end of file",
                ParseErrorKind::NestingTooDeep => "expression is nested too deeply",
                ParseErrorKind::UnknownToken => "unknown token",
                ParseErrorKind::UnterminatedString => "unterminated string",
                ParseErrorKind::UnexpectedToken => "unexpected token",
                ParseErrorKind::IdentifierExpected => "expected identifier",
                ParseErrorKind::ExpressionExpected => "expected expression",
                ParseErrorKind::LeftOperandExpected => "expected left operand",
                ParseErrorKind::RightOperandExpected => "expected right operand",
                ParseErrorKind::InKeywordExpected => "expected `in`",
                ParseErrorKind::EmptyArgument => "empty argument",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Where the error should be shown relative to its span: on the offending
/// token itself, or just past it (for "something is missing here").
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum ErrorLocation {
    Token,
    AfterToken,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub severity: Severity,
    pub location: ErrorLocation,
    pub span: Span,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.severity, self.kind, self.span)
    }
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, location: ErrorLocation, span: Span) -> ParseError {
        ParseError {
            kind,
            severity: Severity::Error,
            location,
            span,
        }
    }

    pub fn warning(kind: ParseErrorKind, location: ErrorLocation, span: Span) -> ParseError {
        ParseError {
            kind,
            severity: Severity::Warning,
            location,
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// The range an editor should underline.
    pub fn display_span(&self) -> Span {
        match self.location {
            ErrorLocation::Token => self.span,
            ErrorLocation::AfterToken => self.span.after(),
        }
    }

    /// Print a source excerpt with a caret line under the error.
    pub fn emit(&self, filepath: &str, text: &str, lines: &LineIndex) {
        let label = format!("{}:", self.severity);
        let label = match self.severity {
            Severity::Error => label.bold().red(),
            Severity::Warning => label.bold().yellow(),
        };
        eprintln!("{} {}", label, self.kind.to_string().bold());

        let span = self.display_span();
        let start = lines.pos(span.start);
        let line = lines.line(text, start.lineno);
        let lineno_str = (start.lineno + 1).to_string();
        let full_spacing = " ".repeat(lineno_str.len() + 1);
        let pipe = "|".bold();

        eprintln!(
            "{}{} {}:{}",
            " ".repeat(lineno_str.len()),
            "-->".bold(),
            filepath,
            start
        );
        eprintln!("{}{}", full_spacing, pipe);
        eprintln!("{} {} {}", lineno_str.bold(), pipe, line);

        let col = line
            .char_indices()
            .take_while(|(i, _)| *i < start.col)
            .count();
        let width = text
            .get(span.start..span.end)
            .map(|s| s.lines().next().unwrap_or("").chars().count())
            .unwrap_or(0)
            .max(1);
        let indicator = "^".repeat(width);
        let indicator = match self.severity {
            Severity::Error => indicator.bold().red(),
            Severity::Warning => indicator.bold().yellow(),
        };
        eprintln!("{}{} {}{}", full_spacing, pipe, " ".repeat(col), indicator);
        eprintln!();
    }
}

/// Collects parse errors in the order they were found.
///
/// Recovery often makes several layers of the parser notice the same problem
/// at the same place; only the first report of a given kind at a given span
/// is kept.
#[derive(Clone, Debug, Default)]
pub struct ErrorSink {
    errors: Vec<ParseError>,
    seen: FnvHashSet<(ParseErrorKind, Span)>,
}

impl ErrorSink {
    pub fn new() -> ErrorSink {
        ErrorSink::default()
    }

    /// Returns `false` if an identical error was already recorded.
    pub fn add(&mut self, error: ParseError) -> bool {
        if !self.seen.insert((error.kind, error.span)) {
            return false;
        }
        log::debug!("recorded {}", error);
        self.errors.push(error);
        true
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

#[cfg(test)]
mod errors_tests {
    use super::*;

    #[test]
    fn sink_deduplicates_kind_and_span() {
        let mut sink = ErrorSink::new();
        let span = Span::new(1, 2);
        assert!(sink.add(ParseError::new(
            ParseErrorKind::RightOperandExpected,
            ErrorLocation::AfterToken,
            span
        )));
        assert!(!sink.add(ParseError::new(
            ParseErrorKind::RightOperandExpected,
            ErrorLocation::Token,
            span
        )));
        assert!(sink.add(ParseError::new(
            ParseErrorKind::ExpressionExpected,
            ErrorLocation::AfterToken,
            span
        )));
        assert!(sink.add(ParseError::new(
            ParseErrorKind::RightOperandExpected,
            ErrorLocation::AfterToken,
            Span::new(2, 3)
        )));
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn categories() {
        assert_eq!(
            ParseErrorKind::CloseCurlyExpected.category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            ParseErrorKind::UnterminatedString.category(),
            ErrorCategory::Lexical
        );
        assert_eq!(
            ParseErrorKind::InKeywordExpected.category(),
            ErrorCategory::Expectation
        );
    }

    #[test]
    fn after_token_errors_point_past_the_span() {
        let err = ParseError::new(
            ParseErrorKind::CloseParenExpected,
            ErrorLocation::AfterToken,
            Span::new(4, 7),
        );
        assert_eq!(err.display_span(), Span::empty_at(7));
        let warn = ParseError::warning(
            ParseErrorKind::EmptyArgument,
            ErrorLocation::Token,
            Span::new(4, 5),
        );
        assert!(!warn.is_error());
        assert_eq!(warn.display_span(), Span::new(4, 5));
    }
}
