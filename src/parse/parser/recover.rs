use crate::{
    ast::{token::TokenKind, NodeId, NodeKind},
    errors::{ErrorLocation, ParseError, ParseErrorKind},
};

use super::Parser;

pub(crate) trait Recover<T> {
    /// Reports `kind` just past the last consumed token when nothing was
    /// parsed.
    fn or_report(self, parser: &mut Parser<'_>, kind: ParseErrorKind) -> Option<T>;
}

impl<T> Recover<T> for Option<T> {
    fn or_report(self, parser: &mut Parser<'_>, kind: ParseErrorKind) -> Option<T> {
        if self.is_none() {
            parser.error_after_previous(kind);
        }
        self
    }
}

impl<'src> Parser<'src> {
    pub(crate) fn record_parse_error(&mut self, err: ParseError) {
        if let Some(desc) = self.ctx.description {
            log::debug!("{} while parsing {}", err, desc);
        }
        self.errors.add(err);
    }

    pub(crate) fn error_at_current(&mut self, kind: ParseErrorKind) {
        let span = self.current().span;
        self.record_parse_error(ParseError::new(kind, ErrorLocation::Token, span));
    }

    /// Reports something missing right after the last consumed token.
    pub(crate) fn error_after_previous(&mut self, kind: ParseErrorKind) {
        match self.tokens.previous() {
            Some(prev) => {
                let span = prev.span;
                self.record_parse_error(ParseError::new(kind, ErrorLocation::AfterToken, span))
            }
            None => self.error_at_current(kind),
        }
    }

    /// A missing closing token is reported after the last consumed token
    /// at end of input, otherwise on the token found in its place.
    pub(crate) fn error_missing_close(&mut self, kind: ParseErrorKind) {
        if self.is_eof() {
            self.error_after_previous(kind);
        } else {
            self.error_at_current(kind);
        }
    }

    pub(crate) fn error_at(&mut self, kind: ParseErrorKind, span: crate::span::Span) {
        self.record_parse_error(ParseError::new(kind, ErrorLocation::Token, span));
    }

    pub(crate) fn warning_at(&mut self, kind: ParseErrorKind, span: crate::span::Span) {
        self.record_parse_error(ParseError::warning(kind, ErrorLocation::Token, span));
    }

    /// Consumes the current token when it has `kind`, otherwise reports
    /// `err` after the previous token.
    pub(crate) fn expect_or_report(
        &mut self,
        kind: TokenKind,
        err: ParseErrorKind,
    ) -> Option<crate::span::Span> {
        expect_if!(self, kind)
            .map(|tok| tok.span)
            .or_report(self, err)
    }

    /// Wraps the current token in an `Error` node. Nothing is consumed at
    /// end of input.
    pub(crate) fn error_node(&mut self) -> Option<NodeId> {
        if self.is_eof() {
            return None;
        }
        let tok = self.advance();
        Some(self.mk_node(NodeKind::Error, tok.span, vec![]))
    }

    /// Records `kind` on the current token and turns it into an `Error` node.
    pub(crate) fn unexpected_token_node(&mut self, kind: ParseErrorKind) -> Option<NodeId> {
        if self.is_eof() {
            return None;
        }
        self.error_at_current(kind);
        self.error_node()
    }

    /// Used once the nesting limit is hit: swallow one token so the
    /// enclosing construct still makes progress.
    pub(crate) fn nesting_error_node(&mut self) -> Option<NodeId> {
        if peek!(
            self,
            TokenKind::CloseParen
                | TokenKind::CloseCurly
                | TokenKind::CloseBracket
                | TokenKind::CloseDoubleBracket
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::EndOfStream
        ) {
            return None;
        }
        self.error_node()
    }
}
