use super::{Parser, Restrictions};

use crate::{
    ast::{Associativity, NodeId, NodeKind, Operator, OperatorKind},
    errors::ParseErrorKind,
    span::Span,
};

impl<'src> Parser<'src> {
    pub(crate) fn parse_expression(&mut self) -> Option<NodeId> {
        self.parse_infix_expr(0)
    }

    /// Precedence climbing over infix operators. Returns `None` only when
    /// nothing was consumed.
    ///
    /// Right operands are parsed one level tighter than their operator.
    /// Right-associative operators wait on `pending` until a looser
    /// operator or the end of the expression folds them, so `a <- b <- c`
    /// chains do not recurse.
    pub(crate) fn parse_infix_expr(&mut self, min_prec: u8) -> Option<NodeId> {
        let mut lhs = self.parse_prefix_expr()?;
        let mut pending: Vec<(NodeId, OperatorKind, Span)> = vec![];

        loop {
            // a line break ends the expression unless we are inside ( ) or [ ]
            if self.is_eol() && !self.is_restricted(Restrictions::IN_GROUP) {
                break;
            }

            let op = match self.peek_infix_op() {
                Some(op) => op,
                None => break,
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            if op == OperatorKind::Equals && self.is_restricted(Restrictions::IN_ARGUMENTS) {
                break;
            }

            while let Some(&(left, pending_op, op_span)) = pending.last() {
                if pending_op.precedence() <= prec {
                    break;
                }
                pending.pop();
                lhs = self.mk_binary(pending_op, op_span, left, lhs);
            }

            let op_tok = self.advance();
            if op == OperatorKind::Tilde {
                self.skip_repeated_tilde();
            }

            let rhs = match self.parse_infix_expr(prec + 1) {
                Some(rhs) => rhs,
                None => {
                    // the dangling operator is dropped, the left side survives
                    self.error_after_previous(ParseErrorKind::RightOperandExpected);
                    break;
                }
            };

            match op.associativity() {
                Associativity::Right => {
                    pending.push((lhs, op, op_tok.span));
                    lhs = rhs;
                }
                Associativity::Left => lhs = self.mk_binary(op, op_tok.span, lhs, rhs),
            }
        }

        while let Some((left, op, op_span)) = pending.pop() {
            lhs = self.mk_binary(op, op_span, left, lhs);
        }
        Some(lhs)
    }

    fn mk_binary(&mut self, op: OperatorKind, op_span: Span, lhs: NodeId, rhs: NodeId) -> NodeId {
        log::trace!("reduced {:?} at {}", op, op_span);
        let span = self.span_of(lhs).extend_to(&self.span_of(rhs));
        self.mk_node(
            NodeKind::Operator(Operator::binary(op, op_span, lhs, rhs)),
            span,
            vec![lhs, rhs],
        )
    }

    /// Prefix operators, then a primary with its postfix chain.
    pub(crate) fn parse_prefix_expr(&mut self) -> Option<NodeId> {
        match self.nested(|p| p.parse_prefix_expr_inner()) {
            Some(expr) => expr,
            None => self.nesting_error_node(),
        }
    }

    fn parse_prefix_expr_inner(&mut self) -> Option<NodeId> {
        if let Some(lexeme) = self.current_operator() {
            let op_tok = self.advance();
            let op = match OperatorKind::unary(lexeme) {
                Some(op) => op,
                None => {
                    // an operator where an operand should be, e.g. `* 2` or `$x`
                    self.error_at(ParseErrorKind::LeftOperandExpected, op_tok.span);
                    return match self.parse_prefix_expr() {
                        Some(operand) => Some(operand),
                        None => Some(self.mk_node(NodeKind::Error, op_tok.span, vec![])),
                    };
                }
            };

            if op == OperatorKind::Tilde {
                self.skip_repeated_tilde();
            }
            let operand = match self.parse_infix_expr(op.precedence()) {
                Some(operand) => operand,
                None => {
                    // the operator alone becomes an error node
                    self.error_after_previous(ParseErrorKind::RightOperandExpected);
                    let span = self.span_from(op_tok.span.start);
                    return Some(self.mk_node(NodeKind::Error, span, vec![]));
                }
            };
            let span = op_tok.span.extend_to(&self.span_of(operand));
            return Some(self.mk_node(
                NodeKind::Operator(Operator::prefix(op, op_tok.span, operand)),
                span,
                vec![operand],
            ));
        }

        let primary = self.parse_primary_expr()?;
        Some(self.parse_postfix_expr(primary))
    }

    fn peek_infix_op(&self) -> Option<OperatorKind> {
        OperatorKind::binary(self.current_operator()?)
    }

    /// `~~x` reads as `~x`.
    fn skip_repeated_tilde(&mut self) {
        while self.current_operator() == Some("~") {
            log::trace!("skipping repeated `~`");
            self.advance();
        }
    }
}

#[cfg(test)]
mod ops_tests {
    use crate::{
        ast::{NodeKind, OperatorKind},
        errors::ParseErrorKind,
        parse::{parse_source, parser::test_utils::*},
        span::Span,
    };

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(sexpr("a + b * c"), "(+ a (* b c))");
        assert_eq!(sexpr("a * b + c"), "(+ (* a b) c)");
        assert_eq!(sexpr("a - b - c"), "(- (- a b) c)");
        assert_eq!(sexpr("a ^ b ^ c"), "(^ a (^ b c))");
        assert_eq!(sexpr("x <- y <- 1"), "(<- x (<- y 1))");
        assert_eq!(sexpr("1 -> x"), "(-> 1 x)");
        assert_eq!(sexpr("a:b + 1"), "(+ (: a b) 1)");
        assert_eq!(sexpr("a %in% b == c"), "(== (%in% a b) c)");
        assert_eq!(sexpr("a | b & c"), "(| a (& b c))");
        assert_eq!(sexpr("y ~ x + z"), "(~ y (+ x z))");
        assert_eq!(sexpr("x = y <- 2"), "(= x (<- y 2))");
        assert_eq!(sexpr("x <- y = 2"), "(= (<- x y) 2)");
        assert_eq!(sexpr("x <- y -> z"), "(<- x (-> y z))");
        assert_eq!(sexpr("a ^ b * c"), "(* (^ a b) c)");
        assert_eq!(sexpr("a ^ b ^ c + d"), "(+ (^ a (^ b c)) d)");
        assert_eq!(sexpr("a |> f() |> g()"), "(|> (|> a (call f)) (call g))");
    }

    #[test]
    fn unary_operators() {
        assert_eq!(sexpr("-a^b"), "(^ (- a) b)");
        assert_eq!(sexpr("-a * b"), "(* (- a) b)");
        assert_eq!(sexpr("!a & b"), "(& (! a) b)");
        assert_eq!(sexpr("!a == b"), "(! (== a b))");
        assert_eq!(sexpr("- - 1"), "(- (- 1))");
        assert_eq!(sexpr("~ x"), "(~ x)");
        assert_eq!(sexpr("?help"), "(? help)");
        assert_eq!(sexpr("a - -b"), "(- a (- b))");
    }

    #[test]
    fn repeated_tilde_collapses() {
        assert_eq!(sexpr("y ~~ x"), "(~ y x)");
        assert_eq!(sexpr("~~x"), "(~ x)");
    }

    #[test]
    fn missing_right_operand_keeps_left() {
        let ast = parse_source("x +");
        let stmt = ast.statements()[0];
        assert_eq!(ast.sexpr(stmt), "x");
        let errors = ast.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::RightOperandExpected);
        assert_eq!(ast.span_text(errors[0].span), "+");
        // the statement still owns the dangling operator's text
        assert_eq!(ast.node_text(stmt), "x +");
    }

    #[test]
    fn missing_left_operand() {
        let ast = parse_source("* 2");
        assert_eq!(ast.sexpr(ast.statements()[0]), "2");
        assert_eq!(
            error_kinds("* 2"),
            vec![ParseErrorKind::LeftOperandExpected]
        );
    }

    #[test]
    fn line_break_ends_expression_outside_groups() {
        assert_eq!(sexprs("a\n+ b"), vec!["a", "(+ b)"]);
        assert_eq!(sexprs("a +\n b"), vec!["(+ a b)"]);
        assert_eq!(sexprs("(a\n+ b)"), vec!["(paren (+ a b))"]);
    }

    #[test]
    fn binary_nodes_have_both_operands() {
        let ast = parse_source("a + b * c - d");
        for (_, node) in ast.iter() {
            if let NodeKind::Operator(op) = &node.kind {
                if !op.is_unary() && op.kind != OperatorKind::Group {
                    assert!(op.left.is_some());
                    assert!(op.right.is_some());
                    assert_eq!(node.children.len(), 2);
                }
            }
        }
    }

    #[test]
    fn prefix_operator_without_operand_stays_in_tree() {
        let ast = parse_source("- ;");
        assert_eq!(ast.statements().len(), 1);
        let stmt = first_statement(&ast);
        assert_eq!(ast.node_text(stmt), "- ;");
        assert_eq!(ast.sexpr(stmt), "<error ->");
        assert_eq!(error_kinds("- ;"), vec![ParseErrorKind::RightOperandExpected]);

        assert_eq!(sexprs("+"), vec!["<error +>"]);
        assert_eq!(sexprs("x + -"), vec!["(+ x <error ->)"]);
        assert_eq!(
            error_kinds("{ ! }"),
            vec![ParseErrorKind::RightOperandExpected]
        );
    }

    #[test]
    fn stray_operator_alone_stays_in_tree() {
        let ast = parse_source("* ;");
        assert_eq!(ast.statements().len(), 1);
        assert_eq!(ast.node_text(first_statement(&ast)), "* ;");
        assert_eq!(sexprs("* ;"), vec!["<error *>"]);
        assert_eq!(error_kinds("* ;"), vec![ParseErrorKind::LeftOperandExpected]);
    }

    #[test]
    fn long_right_associative_chains_do_not_recurse() {
        let src = format!("{}1", "x <- ".repeat(5_000));
        let ast = parse_source(&src);
        assert!(ast.errors().is_empty());
        let assignments = ast
            .iter()
            .filter(|(_, node)| match &node.kind {
                NodeKind::Operator(op) => op.kind == OperatorKind::LeftAssign,
                _ => false,
            })
            .count();
        assert_eq!(assignments, 5_000);
        let top = ast.children(first_statement(&ast))[0];
        assert_eq!(ast.span(top), Span::new(0, src.len()));
        let left = ast.kind(top).as_operator().and_then(|op| op.left);
        assert_eq!(left.map(|id| ast.node_text(id)), Some("x"));

        let src = format!("{}a", "a^".repeat(20_000));
        let ast = parse_source(&src);
        assert!(ast.errors().is_empty());
        assert_eq!(ast.statements().len(), 1);
    }
}
