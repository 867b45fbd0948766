use super::{Parser, Restrictions};

use crate::{
    ast::{
        token::TokenKind, Argument, ArgumentKind, ArgumentList, NodeId, NodeKind, Operator,
        OperatorKind,
    },
    errors::ParseErrorKind,
    span::Span,
};

/// Bracket pair delimiting an argument list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Delimiters {
    Paren,
    Bracket,
    DoubleBracket,
}

impl Delimiters {
    fn close(&self) -> TokenKind {
        match self {
            Delimiters::Paren => TokenKind::CloseParen,
            Delimiters::Bracket => TokenKind::CloseBracket,
            Delimiters::DoubleBracket => TokenKind::CloseDoubleBracket,
        }
    }

    fn missing_close(&self) -> ParseErrorKind {
        match self {
            Delimiters::Paren => ParseErrorKind::CloseParenExpected,
            Delimiters::Bracket => ParseErrorKind::CloseBracketExpected,
            Delimiters::DoubleBracket => ParseErrorKind::CloseDoubleBracketExpected,
        }
    }
}

impl<'src> Parser<'src> {
    /// Calls, indexing and member access bind to the operand before any
    /// infix operator does.
    pub(crate) fn parse_postfix_expr(&mut self, mut ex: NodeId) -> NodeId {
        loop {
            if self.is_eol() && !self.is_restricted(Restrictions::IN_GROUP) {
                return ex;
            }
            ex = match self.peek_kind() {
                TokenKind::OpenParen => self.parse_call_expr(ex),
                TokenKind::OpenBracket => self.parse_index_expr(ex, Delimiters::Bracket),
                TokenKind::OpenDoubleBracket => {
                    self.parse_index_expr(ex, Delimiters::DoubleBracket)
                }
                TokenKind::Operator => {
                    let op = match OperatorKind::postfix(self.current_text()) {
                        Some(op) => op,
                        None => return ex,
                    };
                    match self.parse_member_expr(ex, op) {
                        Some(member) => member,
                        None => return ex,
                    }
                }
                _ => return ex,
            };
        }
    }

    fn parse_call_expr(&mut self, target: NodeId) -> NodeId {
        let start = self.span_of(target).start;
        let (args, open, close) = self.parse_argument_list(Delimiters::Paren);
        let span = self.span_from(start);
        self.mk_node(
            NodeKind::Operator(Operator {
                kind: OperatorKind::FunctionCall,
                unary: false,
                op_span: open,
                left: Some(target),
                right: Some(args),
                close,
            }),
            span,
            vec![target, args],
        )
    }

    fn parse_index_expr(&mut self, target: NodeId, delims: Delimiters) -> NodeId {
        let start = self.span_of(target).start;
        let (args, open, close) = self.parse_argument_list(delims);
        let span = self.span_from(start);
        self.mk_node(
            NodeKind::Operator(Operator {
                kind: OperatorKind::Index,
                unary: false,
                op_span: open,
                left: Some(target),
                right: Some(args),
                close,
            }),
            span,
            vec![target, args],
        )
    }

    /// `x$name`, `x@slot`, `pkg::name`. A missing member name drops the
    /// operator and keeps `lhs`.
    fn parse_member_expr(&mut self, lhs: NodeId, op: OperatorKind) -> Option<NodeId> {
        let op_tok = self.advance();
        let rhs = match self.peek_kind() {
            TokenKind::Identifier | TokenKind::Ellipsis => {
                let tok = self.advance();
                self.mk_node(NodeKind::Variable, tok.span, vec![])
            }
            TokenKind::String => self.parse_string_literal(),
            _ => {
                self.error_after_previous(ParseErrorKind::RightOperandExpected);
                return None;
            }
        };
        let span = self.span_of(lhs).extend_to(&self.span_of(rhs));
        Some(self.mk_node(
            NodeKind::Operator(Operator::binary(op, op_tok.span, lhs, rhs)),
            span,
            vec![lhs, rhs],
        ))
    }

    /// Parses `( ... )`, `[ ... ]` or `[[ ... ]]` starting at the opening
    /// token, which must be current. Returns the list node with its
    /// opening and closing spans.
    pub(crate) fn parse_argument_list(
        &mut self,
        delims: Delimiters,
    ) -> (NodeId, Span, Option<Span>) {
        let open = self.advance();
        let close_kind = delims.close();
        let mut p = self
            .frame()
            .with_restrictions(Restrictions::IN_GROUP | Restrictions::IN_ARGUMENTS)
            .with_description("argument list");

        let mut args = vec![];
        let mut close = None;
        let mut trailing_comma = None;
        loop {
            let kind = p.peek_kind();
            if kind == close_kind {
                close = Some(p.advance().span);
                break;
            }
            match kind {
                TokenKind::EndOfStream | TokenKind::CloseCurly => {
                    p.error_missing_close(delims.missing_close());
                    break;
                }
                TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseDoubleBracket => {
                    // mismatched closer: take it as ours so the caller resyncs
                    p.error_at_current(delims.missing_close());
                    close = Some(p.advance().span);
                    break;
                }
                TokenKind::Comma => {
                    let comma = p.advance().span;
                    trailing_comma = Some(comma);
                    args.push(p.mk_node(
                        NodeKind::Argument(Argument {
                            kind: ArgumentKind::Missing,
                            comma: Some(comma),
                        }),
                        comma,
                        vec![],
                    ));
                    continue;
                }
                _ => {}
            }

            let (arg, comma) = p.parse_argument();
            args.push(arg);
            trailing_comma = comma;
            let at_end = peek!(
                p,
                TokenKind::EndOfStream
                    | TokenKind::CloseParen
                    | TokenKind::CloseBracket
                    | TokenKind::CloseDoubleBracket
                    | TokenKind::CloseCurly
            );
            if comma.is_none() && !at_end {
                p.error_at_current(ParseErrorKind::UnexpectedToken);
            }
        }

        if let Some(comma) = trailing_comma {
            // `x[1, ]` leaves an empty last argument
            let at = close.map_or(comma.end, |c| c.start);
            let span = Span::empty_at(at.max(comma.end));
            if delims == Delimiters::Paren && p.options.warn_empty_arguments {
                p.warning_at(ParseErrorKind::EmptyArgument, comma);
            }
            args.push(p.mk_node(
                NodeKind::Argument(Argument {
                    kind: ArgumentKind::Missing,
                    comma: None,
                }),
                span,
                vec![],
            ));
        }

        let span = p.span_from(open.span.start);
        let list = p.mk_node(
            NodeKind::ArgumentList(ArgumentList {
                open: open.span,
                close,
            }),
            span,
            args,
        );
        (list, open.span, close)
    }

    /// One argument together with its trailing comma, if any. Always
    /// consumes at least one token.
    fn parse_argument(&mut self) -> (NodeId, Option<Span>) {
        let start = self.current().span.start;
        let is_name = matches!(
            self.peek_kind(),
            TokenKind::Identifier | TokenKind::String | TokenKind::Ellipsis | TokenKind::Null
        );
        if is_name
            && self.peek_kind_at(1) == TokenKind::Operator
            && self.text_of(self.tokens.peek(1).span) == "="
        {
            let name = self.advance().span;
            let equals = self.advance().span;
            let value = match self.peek_kind() {
                TokenKind::Comma
                | TokenKind::CloseParen
                | TokenKind::CloseBracket
                | TokenKind::CloseDoubleBracket => None,
                _ => self.parse_expression(),
            };
            let comma = expect_if!(self, TokenKind::Comma).map(|t| t.span);
            let span = self.span_from(start);
            let arg = self.mk_node(
                NodeKind::Argument(Argument {
                    kind: ArgumentKind::Named {
                        name,
                        equals,
                        value,
                    },
                    comma,
                }),
                span,
                value.into_iter().collect(),
            );
            return (arg, comma);
        }

        let before = self.tokens.position();
        let (kind, children) = match self.parse_expression() {
            Some(expr) => (ArgumentKind::Expression(expr), vec![expr]),
            None if self.tokens.position() == before => {
                // e.g. `;` inside a call
                self.error_at_current(ParseErrorKind::UnexpectedToken);
                self.advance();
                (ArgumentKind::Error, vec![])
            }
            None => (ArgumentKind::Error, vec![]),
        };
        let comma = expect_if!(self, TokenKind::Comma).map(|t| t.span);
        let span = self.span_from(start);
        let arg = self.mk_node(
            NodeKind::Argument(Argument { kind, comma }),
            span,
            children,
        );
        (arg, comma)
    }
}

#[cfg(test)]
mod expr_tests {
    use crate::{
        ast::{ArgumentKind, NodeKind},
        errors::{ParseErrorKind, Severity},
        parse::{parse_source, parser::test_utils::*},
    };

    #[test]
    fn calls_and_named_arguments() {
        assert_eq!(sexpr("f(a, b = 2, ...)"), "(call f a (= b 2) ...)");
        assert_eq!(sexpr("f(g(x))(y)"), "(call (call f (call g x)) y)");
        assert_eq!(sexpr("f('a' = 1, NULL = 2)"), "(call f (= 'a' 1) (= NULL 2))");
        assert_eq!(sexpr("f(x = )"), "(call f (= x))");
    }

    #[test]
    fn equals_inside_arguments_names_them() {
        assert_eq!(sexpr("f(a == b)"), "(call f (== a b))");
        assert_eq!(sexpr("f((a = b))"), "(call f (paren (= a b)))");
    }

    #[test]
    fn indexing() {
        assert_eq!(sexpr("x[1]"), "([ x 1)");
        assert_eq!(sexpr("x[[\"a\"]]"), "([[ x \"a\")");
        assert_eq!(sexpr("x[, 1]"), "([ x _ 1)");
        assert_eq!(sexpr("x[1, ]"), "([ x 1 _)");
        assert_eq!(sexpr("m[i, j][[k]]"), "([[ ([ m i j) k)");
        assert!(parse_source("x[, 1]").errors().is_empty());
    }

    #[test]
    fn member_access_binds_tightest() {
        assert_eq!(sexpr("a$b$c"), "($ ($ a b) c)");
        assert_eq!(sexpr("-a$b"), "(- ($ a b))");
        assert_eq!(sexpr("pkg::f(x)"), "(call (:: pkg f) x)");
        assert_eq!(sexpr("obj@slot + 1"), "(+ (@ obj slot) 1)");
        assert_eq!(sexpr("l$\"key\""), "($ l \"key\")");
    }

    #[test]
    fn missing_member_name() {
        let ast = parse_source("a$");
        assert_eq!(ast.sexpr(ast.statements()[0]), "a");
        assert_eq!(
            error_kinds("a$"),
            vec![ParseErrorKind::RightOperandExpected]
        );
    }

    #[test]
    fn missing_close_paren() {
        let ast = parse_source("f(a, b");
        assert_eq!(ast.sexpr(ast.statements()[0]), "(call f a b)");
        assert_eq!(
            error_kinds("f(a, b"),
            vec![ParseErrorKind::CloseParenExpected]
        );
    }

    #[test]
    fn mismatched_close_is_consumed() {
        let ast = parse_source("f(a]\ny");
        assert_eq!(ast.statements().len(), 2);
        let errors = ast.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::CloseParenExpected);
        assert_eq!(ast.span_text(errors[0].span), "]");
        assert_eq!(error_kinds("x[[1]"), vec![ParseErrorKind::CloseDoubleBracketExpected]);
    }

    #[test]
    fn trailing_empty_argument_warns_in_calls() {
        let ast = parse_source("f(a, )");
        let errors = ast.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::EmptyArgument);
        assert_eq!(errors[0].severity, Severity::Warning);
        assert!(!ast.has_errors());
        assert_eq!(ast.sexpr(ast.statements()[0]), "(call f a _)");
    }

    #[test]
    fn unseparated_arguments() {
        assert_eq!(sexpr("f(a b)"), "(call f a b)");
        assert_eq!(error_kinds("f(a b)"), vec![ParseErrorKind::UnexpectedToken]);
        assert_eq!(sexpr("f(a; b)"), "(call f a <error> b)");
    }

    #[test]
    fn argument_spans_cover_their_comma() {
        let ast = parse_source("f(a, b)");
        let args = ast
            .iter()
            .filter_map(|(id, node)| match &node.kind {
                NodeKind::Argument(arg) => Some((id, arg)),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(args.len(), 2);
        assert_eq!(ast.node_text(args[0].0), "a,");
        assert!(args[0].1.comma.is_some());
        assert!(matches!(args[1].1.kind, ArgumentKind::Expression(_)));
        assert_eq!(ast.node_text(args[1].0), "b");
    }

    #[test]
    fn line_breaks_inside_calls() {
        assert_eq!(sexpr("f(a,\n  b\n)"), "(call f a b)");
        assert_eq!(sexprs("f\n(x)"), vec!["f", "(paren x)"]);
    }
}
