use super::{expr::Delimiters, Parser, Restrictions};

use crate::{
    ast::{
        token::{is_terminated_string, Keyword, TokenKind},
        ArgumentKind, FunctionDefinition, LiteralKind, NodeId, NodeKind, Operator, OperatorKind,
    },
    errors::ParseErrorKind,
};

impl<'src> Parser<'src> {
    /// An operand: a name, a literal, a group, a block, a function or a
    /// control flow construct. `None` means nothing was consumed.
    pub(crate) fn parse_primary_expr(&mut self) -> Option<NodeId> {
        let kind = self.peek_kind();
        match kind {
            TokenKind::Identifier | TokenKind::Ellipsis => {
                let tok = self.advance();
                Some(self.mk_node(NodeKind::Variable, tok.span, vec![]))
            }
            TokenKind::String => Some(self.parse_string_literal()),
            _ if kind.is_literal() => {
                let tok = self.advance();
                let kind = match LiteralKind::from_token(tok.kind) {
                    Some(lit) => NodeKind::Literal(lit),
                    None => NodeKind::Error,
                };
                Some(self.mk_node(kind, tok.span, vec![]))
            }
            TokenKind::OpenParen => Some(self.parse_group_expr()),
            TokenKind::OpenCurly => self.parse_scope(false),
            TokenKind::Keyword => self.parse_keyword_expr(),
            TokenKind::Unknown => self.unexpected_token_node(ParseErrorKind::UnknownToken),
            TokenKind::OpenBracket => Some(self.parse_stray_brackets(Delimiters::Bracket)),
            TokenKind::OpenDoubleBracket => {
                Some(self.parse_stray_brackets(Delimiters::DoubleBracket))
            }
            _ => None,
        }
    }

    pub(crate) fn parse_string_literal(&mut self) -> NodeId {
        let tok = self.advance();
        if !is_terminated_string(self.text_of(tok.span)) {
            self.error_at(ParseErrorKind::UnterminatedString, tok.span);
        }
        self.mk_node(NodeKind::Literal(LiteralKind::String), tok.span, vec![])
    }

    /// `[1]` with nothing to index. The whole bracket list is kept under
    /// an `Error` node.
    fn parse_stray_brackets(&mut self, delims: Delimiters) -> NodeId {
        let start = self.current().span.start;
        self.error_at_current(ParseErrorKind::UnexpectedToken);
        let (args, _, _) = self.parse_argument_list(delims);
        let span = self.span_from(start);
        self.mk_node(NodeKind::Error, span, vec![args])
    }

    fn parse_group_expr(&mut self) -> NodeId {
        let open = self.advance().span;
        let mut p = self
            .frame()
            .with_restrictions(Restrictions::IN_GROUP)
            .without_restrictions(Restrictions::IN_ARGUMENTS)
            .with_description("parenthesized expression");

        let inner = p.parse_expression();
        if inner.is_none() {
            p.error_after_previous(ParseErrorKind::ExpressionExpected);
        }
        let close = expect_if!(p, TokenKind::CloseParen).map(|t| t.span);
        if close.is_none() {
            p.error_missing_close(ParseErrorKind::CloseParenExpected);
        }

        let span = p.span_from(open.start);
        p.mk_node(
            NodeKind::Operator(Operator {
                kind: OperatorKind::Group,
                unary: false,
                op_span: open,
                left: inner,
                right: None,
                close,
            }),
            span,
            inner.into_iter().collect(),
        )
    }

    fn parse_keyword_expr(&mut self) -> Option<NodeId> {
        let keyword = match self.current_keyword() {
            Some(keyword) => keyword,
            None => return self.unexpected_token_node(ParseErrorKind::UnexpectedToken),
        };
        match keyword {
            Keyword::Function => Some(self.parse_function_definition()),
            Keyword::If
            | Keyword::For
            | Keyword::While
            | Keyword::Repeat
            | Keyword::Break
            | Keyword::Next => {
                let start = self.current().span.start;
                let kind = self.parse_control_statement(keyword);
                Some(self.mk_statement(kind, start, None))
            }
            // plain function names when used as operands: `f(return(x))`
            Keyword::Return | Keyword::Typeof | Keyword::Library | Keyword::Require => {
                let tok = self.advance();
                Some(self.mk_node(NodeKind::Variable, tok.span, vec![]))
            }
            Keyword::Else | Keyword::In => {
                self.unexpected_token_node(ParseErrorKind::UnexpectedToken)
            }
        }
    }

    /// `function(a, b = 1) body` or `\(x) body`.
    fn parse_function_definition(&mut self) -> NodeId {
        let keyword = self.advance().span;
        log::debug!("function definition at {}", keyword);

        let arguments = if peek!(self, TokenKind::OpenParen) {
            let (args, _, _) = self.parse_argument_list(Delimiters::Paren);
            self.check_formals(args);
            Some(args)
        } else {
            self.error_after_previous(ParseErrorKind::OpenParenExpected);
            None
        };

        let body = self.parse_body();
        let span = self.span_from(keyword.start);
        let children = arguments.into_iter().chain(body).collect();
        self.mk_node(
            NodeKind::FunctionDefinition(FunctionDefinition {
                keyword,
                arguments,
                body,
            }),
            span,
            children,
        )
    }

    /// Formals are names, `...` or `name = default`.
    fn check_formals(&mut self, args: NodeId) {
        let formals = self.arena.get(args).children.clone();
        for formal in formals {
            let bad = match self.node_kind(formal) {
                NodeKind::Argument(arg) => match &arg.kind {
                    ArgumentKind::Expression(expr) => {
                        !matches!(self.node_kind(*expr), NodeKind::Variable)
                    }
                    ArgumentKind::Named { name, .. } => {
                        !is_formal_name(self.text_of(*name))
                    }
                    ArgumentKind::Missing => true,
                    ArgumentKind::Error => false,
                },
                _ => false,
            };
            if bad {
                let span = self.span_of(formal);
                self.error_at(ParseErrorKind::IdentifierExpected, span);
            }
        }
    }
}

/// Strings cannot name formals.
fn is_formal_name(lexeme: &str) -> bool {
    !lexeme.starts_with('"') && !lexeme.starts_with('\'') && lexeme != "NULL"
}
