use super::{expr::Delimiters, recover::Recover, Parser, Restrictions};

use crate::{
    ast::{
        token::{Keyword, TokenKind},
        ArgumentKind, ForStatement, IfStatement, KeywordCall, LiteralKind, NodeId, NodeKind,
        RepeatStatement, StatementKind, WhileStatement,
    },
    errors::ParseErrorKind,
    span::Span,
};

impl<'src> Parser<'src> {
    /// `if`, `for`, `while`, `repeat`, `break` and `next`. The keyword is
    /// the current token.
    pub(crate) fn parse_control_statement(&mut self, keyword: Keyword) -> StatementKind {
        log::debug!("{} statement at {}", keyword, self.current().span);
        match keyword {
            Keyword::If => StatementKind::If(self.parse_if()),
            Keyword::For => StatementKind::For(self.parse_for()),
            Keyword::While => StatementKind::While(self.parse_while()),
            Keyword::Repeat => StatementKind::Repeat(self.parse_repeat()),
            Keyword::Break => StatementKind::Break {
                keyword: self.advance().span,
            },
            Keyword::Next => StatementKind::Next {
                keyword: self.advance().span,
            },
            _ => self.parse_keyword_call(keyword),
        }
    }

    fn parse_if(&mut self) -> IfStatement {
        let keyword = self.advance().span;
        let (open, condition, close) = self.parse_condition();
        let mut stmt = IfStatement {
            keyword,
            open,
            condition,
            close,
            body: None,
            else_keyword: None,
            else_body: None,
        };
        if open.is_none() || close.is_none() {
            return stmt;
        }

        stmt.body = self.parse_body();

        // at top level an `else` on its own line belongs to nothing
        let else_allowed =
            !self.is_eol() || self.is_restricted(Restrictions::IN_CURLY | Restrictions::IN_GROUP);
        if self.at_keyword(Keyword::Else) && else_allowed {
            stmt.else_keyword = Some(self.advance().span);
            stmt.else_body = self.parse_body();
        }
        stmt
    }

    fn parse_for(&mut self) -> ForStatement {
        let keyword = self.advance().span;
        let mut stmt = ForStatement {
            keyword,
            open: None,
            variable: None,
            in_keyword: None,
            sequence: None,
            close: None,
            body: None,
        };
        let open = unless!(
            self.expect_or_report(TokenKind::OpenParen, ParseErrorKind::OpenParenExpected),
            else return stmt
        );
        stmt.open = Some(open);

        {
            let mut p = self
                .frame()
                .with_restrictions(Restrictions::IN_GROUP)
                .without_restrictions(Restrictions::IN_ARGUMENTS)
                .with_description("for loop header");

            if peek!(p, TokenKind::Identifier) {
                let tok = p.advance();
                stmt.variable = Some(p.mk_node(NodeKind::Variable, tok.span, vec![]));
            } else if p.at_keyword(Keyword::In) || p.is_eof() {
                p.error_after_previous(ParseErrorKind::IdentifierExpected);
            } else {
                stmt.variable = p.unexpected_token_node(ParseErrorKind::IdentifierExpected);
            }

            if p.at_keyword(Keyword::In) {
                stmt.in_keyword = Some(p.advance().span);
            } else {
                p.error_missing_close(ParseErrorKind::InKeywordExpected);
            }

            stmt.sequence = p
                .parse_expression()
                .or_report(&mut p, ParseErrorKind::ExpressionExpected);
            stmt.close = expect_if!(p, TokenKind::CloseParen).map(|t| t.span);
            if stmt.close.is_none() {
                p.error_missing_close(ParseErrorKind::CloseParenExpected);
                return stmt;
            }
        }

        stmt.body = self.parse_body();
        stmt
    }

    fn parse_while(&mut self) -> WhileStatement {
        let keyword = self.advance().span;
        let (open, condition, close) = self.parse_condition();
        let mut stmt = WhileStatement {
            keyword,
            open,
            condition,
            close,
            body: None,
        };
        if open.is_some() && close.is_some() {
            stmt.body = self.parse_body();
        }
        stmt
    }

    fn parse_repeat(&mut self) -> RepeatStatement {
        let keyword = self.advance().span;
        let body = self
            .parse_scope(false)
            .or_report(self, ParseErrorKind::OpenCurlyExpected);
        RepeatStatement { keyword, body }
    }

    /// `( expr )` after `if` and `while`.
    fn parse_condition(&mut self) -> (Option<Span>, Option<NodeId>, Option<Span>) {
        let open = unless!(
            self.expect_or_report(TokenKind::OpenParen, ParseErrorKind::OpenParenExpected),
            else return (None, None, None)
        );

        let mut p = self
            .frame()
            .with_restrictions(Restrictions::IN_GROUP)
            .without_restrictions(Restrictions::IN_ARGUMENTS)
            .with_description("condition");
        let condition = p
            .parse_expression()
            .or_report(&mut p, ParseErrorKind::ExpressionExpected);
        let close = expect_if!(p, TokenKind::CloseParen).map(|t| t.span);
        if close.is_none() {
            p.error_missing_close(ParseErrorKind::CloseParenExpected);
        }
        (Some(open), condition, close)
    }

    /// The body of a function or loop: a block or a single statement.
    pub(crate) fn parse_body(&mut self) -> Option<NodeId> {
        if self.is_eof() {
            self.error_after_previous(ParseErrorKind::UnexpectedEndOfFile);
            return None;
        }
        if self.at_keyword(Keyword::Else) {
            // `if (a) else b`
            self.error_after_previous(ParseErrorKind::ExpressionExpected);
            return None;
        }
        self.parse_scope(true)
            .or_report(self, ParseErrorKind::ExpressionExpected)
    }

    /// `return(...)`, `typeof(...)`, `library(...)` and `require(...)` in
    /// statement position.
    pub(crate) fn parse_keyword_call(&mut self, keyword: Keyword) -> StatementKind {
        let keyword_span = self.advance().span;
        let arguments = if peek!(self, TokenKind::OpenParen) {
            let (args, _, _) = self.parse_argument_list(Delimiters::Paren);
            if matches!(keyword, Keyword::Library | Keyword::Require) {
                self.check_package_name(args);
            }
            Some(args)
        } else {
            self.error_after_previous(ParseErrorKind::OpenParenExpected);
            None
        };
        StatementKind::KeywordCall(KeywordCall {
            keyword,
            keyword_span,
            arguments,
        })
    }

    /// `library(pkg)` and `library("pkg")` name a package, `library(1)`
    /// does not.
    fn check_package_name(&mut self, args: NodeId) {
        let first = unless!(self.arena.get(args).children.first().copied());
        let value = match self.node_kind(first) {
            NodeKind::Argument(arg) => match &arg.kind {
                ArgumentKind::Expression(expr) => Some(*expr),
                ArgumentKind::Named { value, .. } => *value,
                ArgumentKind::Missing | ArgumentKind::Error => None,
            },
            _ => None,
        };
        let value = unless!(value);
        let is_name = matches!(
            self.node_kind(value),
            NodeKind::Variable | NodeKind::Literal(LiteralKind::String)
        );
        if !is_name {
            let span = self.span_of(value);
            self.error_at(ParseErrorKind::IdentifierExpected, span);
        }
    }
}

#[cfg(test)]
mod control_tests {
    use crate::{
        ast::{NodeKind, StatementKind},
        errors::ParseErrorKind,
        parse::{parse_source, parser::test_utils::*},
    };

    #[test]
    fn if_with_simple_scope() {
        let ast = assert_clean("if (x) y <- 1");
        let stmt = first_statement(&ast);
        let body = match &ast.kind(stmt) {
            NodeKind::Statement(s) => match &s.kind {
                StatementKind::If(if_stmt) => if_stmt.body.unwrap(),
                other => panic!("not an if: {:?}", other),
            },
            other => panic!("not a statement: {:?}", other),
        };
        match ast.kind(body) {
            NodeKind::Scope(scope) => {
                assert!(scope.is_simple());
                assert_eq!(scope.close, None);
            }
            other => panic!("not a scope: {:?}", other),
        }
        assert_eq!(ast.children(body).len(), 1);
        assert_eq!(ast.sexpr(ast.children(body)[0]), "(<- y 1)");
    }

    #[test]
    fn if_else() {
        assert_eq!(sexpr("if (a) b else c"), "(if a b c)");
        assert_eq!(
            sexpr("if (a) {\n  b\n} else if (c) {\n  d\n}"),
            "(if a (block b) (if c (block d)))"
        );
        assert_eq!(sexpr("{\n  if (a) b\n  else c\n}"), "(block (if a b c))");
        assert_eq!(sexpr("f(if (a) b\n else c)"), "(call f (if a b c))");
    }

    #[test]
    fn else_on_new_line_at_top_level() {
        let ast = parse_source("if (a) b\nelse c");
        assert_eq!(ast.statements().len(), 2);
        assert_eq!(ast.sexpr(ast.statements()[0]), "(if a b)");
        assert_eq!(
            error_kinds("if (a) b\nelse c"),
            vec![ParseErrorKind::UnexpectedToken]
        );
    }

    #[test]
    fn if_recovery() {
        assert_eq!(sexprs("if a"), vec!["(if)", "a"]);
        assert_eq!(error_kinds("if"), vec![ParseErrorKind::OpenParenExpected]);
        assert_eq!(
            error_kinds("if (a) else b"),
            vec![ParseErrorKind::ExpressionExpected]
        );
        assert_eq!(sexpr("if (a) else b"), "(if a b)");
        assert_eq!(error_kinds("if (a"), vec![ParseErrorKind::CloseParenExpected]);
    }

    #[test]
    fn loops() {
        assert_eq!(
            sexpr("for (i in 1:10) {\n  print(i)\n}"),
            "(for i (: 1 10) (block (call print i)))"
        );
        assert_eq!(sexpr("while (TRUE) break"), "(while TRUE break)");
        assert_eq!(sexpr("repeat { next }"), "(repeat (block next))");
    }

    #[test]
    fn for_recovery() {
        assert_eq!(
            error_kinds("for (1 in x) y"),
            vec![ParseErrorKind::IdentifierExpected]
        );
        assert_eq!(
            error_kinds("for (i x) y"),
            vec![ParseErrorKind::InKeywordExpected]
        );
        assert_eq!(sexpr("for (i x) y"), "(for i x y)");
    }

    #[test]
    fn repeat_needs_braces() {
        assert_eq!(
            error_kinds("repeat\n"),
            vec![ParseErrorKind::OpenCurlyExpected]
        );
    }

    #[test]
    fn keyword_calls() {
        assert_eq!(sexpr("library(dplyr)"), "(library dplyr)");
        assert_eq!(sexpr("require('x', quietly = TRUE)"), "(require 'x' (= quietly TRUE))");
        assert_eq!(sexpr("return(x + 1)"), "(return (+ x 1))");
        assert_eq!(
            error_kinds("library(1)"),
            vec![ParseErrorKind::IdentifierExpected]
        );
        assert_eq!(error_kinds("return"), vec![ParseErrorKind::OpenParenExpected]);
        assert_eq!(sexpr("return"), "(return)");
    }
}
