mod atoms;
mod context;
mod control;
mod expr;
mod ops;
mod recover;
mod scope;
mod stmt;

use serde::{Deserialize, Serialize};

use crate::{
    ast::{
        token::{Keyword, Token, TokenKind, TokenList, TokenStream},
        Ast, NodeArena, NodeId, NodeKind, StatementKind,
    },
    errors::{ErrorSink, ParseErrorKind},
    span::Span,
};

pub use context::ParseContext;

bitflags::bitflags! {
    pub struct Restrictions: u8 {
        /// Inside `( )` or a condition: line breaks do not end expressions.
        const IN_GROUP     = 1 << 0;
        /// Inside an argument list: a bare `=` names an argument.
        const IN_ARGUMENTS = 1 << 1;
        /// Inside `{ }`.
        const IN_CURLY     = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// How deeply expressions and statements may nest before the parser
    /// gives up on the construct and reports it.
    pub max_depth: usize,
    /// Report `f(a, )` style trailing empty arguments in calls.
    pub warn_empty_arguments: bool,
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions {
            max_depth: 256,
            warn_empty_arguments: true,
        }
    }
}

pub struct Parser<'src> {
    text: &'src str,
    list: &'src TokenList,
    tokens: TokenStream<'src>,
    ctx: ParseContext,
    arena: NodeArena,
    errors: ErrorSink,
    options: ParseOptions,
}

impl<'src> Parser<'src> {
    pub fn new(text: &'src str, list: &'src TokenList, options: &ParseOptions) -> Parser<'src> {
        Parser {
            text,
            list,
            tokens: list.stream(),
            ctx: ParseContext::new(),
            arena: NodeArena::default(),
            errors: ErrorSink::new(),
            options: options.clone(),
        }
    }

    pub fn parse_file(mut self) -> Ast {
        log::debug!("parsing {} tokens", self.list.len());
        let root = self.parse_global_scope();
        self.finish(root)
    }

    pub fn parse_single_expression(mut self) -> Ast {
        let start = self.current().span.start;
        let before = self.tokens.position();
        let expr = self.parse_expression();

        let mut children = vec![];
        if self.tokens.position() == before {
            self.error_at_current(ParseErrorKind::ExpressionExpected);
        } else {
            children.push(self.mk_statement(StatementKind::Expression { expr }, start, None));
        }

        if !self.is_eof() {
            self.error_at_current(ParseErrorKind::UnexpectedToken);
        }
        let root = self.mk_node(
            NodeKind::GlobalScope,
            Span::new(0, self.text.len()),
            children,
        );
        self.finish(root)
    }

    fn finish(self, root: NodeId) -> Ast {
        log::debug!(
            "built {} nodes with {} errors",
            self.arena.len(),
            self.errors.len()
        );
        Ast::new(
            self.arena.into_nodes(),
            root,
            self.list.clone(),
            self.text.to_string(),
            self.errors.into_vec(),
        )
    }

    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    fn current(&self) -> Token {
        *self.tokens.current()
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens.current().kind
    }

    fn peek_kind_at(&self, n: usize) -> TokenKind {
        self.tokens.peek(n).kind
    }

    fn text_of(&self, span: Span) -> &'src str {
        self.text.get(span.start..span.end).unwrap_or("")
    }

    fn current_text(&self) -> &'src str {
        self.text_of(self.tokens.current().span)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.advance();
        log::trace!("consumed {} `{}`", tok, self.text_of(tok.span));
        tok
    }

    fn expect_kind(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind() == kind {
            Some(self.advance())
        } else {
            None
        }
    }

    fn is_eof(&self) -> bool {
        self.tokens.is_end_of_stream()
    }

    /// True when a line break separates the previous token from the
    /// current one, or the input is exhausted.
    fn is_eol(&self) -> bool {
        self.tokens.is_line_break_before(self.text)
    }

    fn prev_end(&self) -> usize {
        self.tokens.previous().map_or(0, |t| t.span.end)
    }

    /// From `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    fn current_keyword(&self) -> Option<Keyword> {
        if peek!(self, TokenKind::Keyword) {
            Keyword::from_lexeme(self.current_text())
        } else {
            None
        }
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current_keyword() == Some(keyword)
    }

    fn current_operator(&self) -> Option<&'src str> {
        if peek!(self, TokenKind::Operator) {
            Some(self.current_text())
        } else {
            None
        }
    }

    fn is_restricted(&self, r: Restrictions) -> bool {
        self.ctx.restrictions.intersects(r)
    }

    fn mk_node(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        self.arena.alloc(kind, span, children)
    }

    fn span_of(&self, id: NodeId) -> Span {
        self.arena.span(id)
    }

    fn node_kind(&self, id: NodeId) -> &NodeKind {
        &self.arena.get(id).kind
    }
}
