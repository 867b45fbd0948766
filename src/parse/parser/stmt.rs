use super::Parser;

use crate::{
    ast::{
        token::{Keyword, TokenKind},
        NodeId, NodeKind, Statement, StatementKind,
    },
    errors::ParseErrorKind,
    span::Span,
};

impl<'src> Parser<'src> {
    /// Statements up to `stop` or the end of input. `stop` is left for the
    /// caller to consume.
    pub(crate) fn parse_statement_list(&mut self, stop: Option<TokenKind>) -> Vec<NodeId> {
        let mut statements = vec![];
        loop {
            if self.is_eof() || self.at_stop(stop) {
                break;
            }

            let stmt = match self.parse_statement() {
                Some(stmt) => stmt,
                None => {
                    // a token no statement can start with, e.g. a stray `)`
                    statements.push(self.parse_unexpected_statement());
                    continue;
                }
            };
            statements.push(stmt);

            let separated = self.is_eol()
                || self
                    .tokens
                    .previous()
                    .map_or(false, |t| t.kind == TokenKind::Semicolon)
                || self.at_stop(stop);
            if !separated {
                self.error_at_current(ParseErrorKind::UnexpectedToken);
            }
        }
        statements
    }

    fn at_stop(&self, stop: Option<TokenKind>) -> bool {
        stop.map_or(false, |kind| self.peek_kind() == kind)
    }

    /// One statement and its `;`. `None` only when nothing was consumed.
    pub(crate) fn parse_statement(&mut self) -> Option<NodeId> {
        match self.nested(|p| p.parse_statement_inner()) {
            Some(stmt) => stmt,
            None => {
                let start = self.current().span.start;
                let err = self.nesting_error_node()?;
                let kind = StatementKind::Expression { expr: Some(err) };
                Some(self.mk_statement(kind, start, None))
            }
        }
    }

    fn parse_statement_inner(&mut self) -> Option<NodeId> {
        let start = self.current().span.start;
        if peek!(self, TokenKind::Semicolon) {
            // zero-width, the `;` is only its separator
            let semicolon = self.advance().span;
            let stmt = Statement {
                kind: StatementKind::Empty,
                semicolon: Some(semicolon),
            };
            return Some(self.mk_node(NodeKind::Statement(stmt), Span::empty_at(start), vec![]));
        }

        let kind = match self.current_keyword() {
            Some(
                keyword @ (Keyword::If
                | Keyword::For
                | Keyword::While
                | Keyword::Repeat
                | Keyword::Break
                | Keyword::Next),
            ) => self.parse_control_statement(keyword),
            Some(keyword) if keyword.is_call_like() => self.parse_keyword_call(keyword),
            Some(Keyword::Else) => self.parse_stray_else(),
            _ => StatementKind::Expression {
                expr: Some(self.parse_expression()?),
            },
        };

        let semicolon = expect_if!(self, TokenKind::Semicolon).map(|t| t.span);
        Some(self.mk_statement(kind, start, semicolon))
    }

    /// Allocates a statement spanning from `start` to the last consumed
    /// token.
    pub(crate) fn mk_statement(
        &mut self,
        kind: StatementKind,
        start: usize,
        semicolon: Option<Span>,
    ) -> NodeId {
        let span = self.span_from(start);
        let children = kind.children();
        log::trace!("{} at {}", kind.desc(), span);
        self.mk_node(
            NodeKind::Statement(Statement { kind, semicolon }),
            span,
            children,
        )
    }

    /// An `else` with no `if` to attach to. Its body is kept under an
    /// `Error` node.
    fn parse_stray_else(&mut self) -> StatementKind {
        let start = self.current().span.start;
        self.error_at_current(ParseErrorKind::UnexpectedToken);
        self.advance();
        let body = self.parse_body();
        let span = self.span_from(start);
        let err = self.mk_node(NodeKind::Error, span, body.into_iter().collect());
        StatementKind::Expression { expr: Some(err) }
    }

    fn parse_unexpected_statement(&mut self) -> NodeId {
        let start = self.current().span.start;
        let err = self.unexpected_token_node(ParseErrorKind::UnexpectedToken);
        self.mk_statement(StatementKind::Expression { expr: err }, start, None)
    }
}
