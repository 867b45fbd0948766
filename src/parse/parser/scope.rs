use super::{Parser, Restrictions};

use crate::{
    ast::{token::TokenKind, NodeId, NodeKind, Scope},
    errors::ParseErrorKind,
    span::Span,
};

impl<'src> Parser<'src> {
    /// The whole buffer. Always spans the full text, even when it holds no
    /// statements.
    pub(crate) fn parse_global_scope(&mut self) -> NodeId {
        let statements = self.parse_statement_list(None);
        self.mk_node(
            NodeKind::GlobalScope,
            Span::new(0, self.text.len()),
            statements,
        )
    }

    /// A `{ ... }` block, or with `allow_simple` a single unbraced
    /// statement. `None` when neither is present.
    pub(crate) fn parse_scope(&mut self, allow_simple: bool) -> Option<NodeId> {
        if peek!(self, TokenKind::OpenCurly) {
            return Some(self.parse_braced_scope());
        }
        if !allow_simple {
            return None;
        }

        let stmt = self.parse_statement()?;
        let span = self.span_of(stmt);
        Some(self.mk_node(
            NodeKind::Scope(Scope {
                open: None,
                close: None,
            }),
            span,
            vec![stmt],
        ))
    }

    fn parse_braced_scope(&mut self) -> NodeId {
        let open = self.advance().span;
        let mut p = self
            .frame()
            .with_restrictions(Restrictions::IN_CURLY)
            .without_restrictions(Restrictions::IN_GROUP | Restrictions::IN_ARGUMENTS)
            .with_description("braced scope");

        let statements = p.parse_statement_list(Some(TokenKind::CloseCurly));
        let close = expect_if!(p, TokenKind::CloseCurly).map(|t| t.span);
        if close.is_none() {
            p.error_missing_close(ParseErrorKind::CloseCurlyExpected);
        }

        let span = p.span_from(open.start);
        p.mk_node(
            NodeKind::Scope(Scope {
                open: Some(open),
                close,
            }),
            span,
            statements,
        )
    }
}

#[cfg(test)]
mod scope_tests {
    use crate::{
        ast::NodeKind,
        errors::ParseErrorKind,
        parse::{parse_source, parser::test_utils::*},
    };

    #[test]
    fn braced_scope_spans_its_braces() {
        let ast = assert_clean("f <- function() {\n  a\n  b\n}\n");
        let scope = ast
            .iter()
            .find(|(_, n)| matches!(&n.kind, NodeKind::Scope(s) if !s.is_simple()))
            .map(|(id, _)| id)
            .unwrap();
        assert_eq!(ast.node_text(scope), "{\n  a\n  b\n}");
        assert_eq!(ast.children(scope).len(), 2);
    }

    #[test]
    fn unclosed_brace_keeps_statements() {
        let ast = parse_source("{\n  a <- 1\n  b");
        assert_eq!(ast.sexpr(ast.root()), "(global (block (<- a 1) b))");
        let errors = ast.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::CloseCurlyExpected);
        assert_eq!(ast.span_text(errors[0].span), "b");
    }

    #[test]
    fn empty_block() {
        assert_eq!(sexpr("{}"), "(block)");
        let ast = assert_clean("{ }");
        let block = ast.children(first_statement(&ast))[0];
        assert_eq!(ast.node_text(block), "{ }");
    }

    #[test]
    fn stray_closers_inside_blocks() {
        let ast = parse_source("{ a )\n b }");
        assert_eq!(ast.sexpr(ast.root()), "(global (block a <error )> b))");
        assert_eq!(
            ast.errors().iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![ParseErrorKind::UnexpectedToken]
        );
    }

    #[test]
    fn global_scope_covers_the_text() {
        let ast = parse_source("  \n# only a comment\n");
        assert_eq!(ast.span(ast.root()).end, ast.text().len());
        assert!(ast.statements().is_empty());
        assert_eq!(ast.comments().len(), 1);
    }
}
