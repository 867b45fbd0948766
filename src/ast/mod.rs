use std::fmt;

use serde::Serialize;

use crate::{
    ast::token::{Token, TokenKind, TokenList},
    errors::ParseError,
    span::Span,
};

pub mod op;
mod print;
pub mod stmt;
pub mod token;
mod walk;

pub use op::{Associativity, OperatorKind};
pub use stmt::{
    ForStatement, IfStatement, KeywordCall, RepeatStatement, Statement, StatementKind,
    WhileStatement,
};
pub use walk::{Ancestors, Descendants};

/// Index of a node inside its `Ast`. Ids are handed out in allocation
/// order, so the same input always yields the same ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralKind {
    Number,
    Complex,
    String,
    Logical,
    Null,
    Missing,
    Infinity,
    NaN,
}

impl LiteralKind {
    pub fn from_token(kind: TokenKind) -> Option<LiteralKind> {
        Some(match kind {
            TokenKind::Number => LiteralKind::Number,
            TokenKind::Complex => LiteralKind::Complex,
            TokenKind::String => LiteralKind::String,
            TokenKind::Logical => LiteralKind::Logical,
            TokenKind::Null => LiteralKind::Null,
            TokenKind::Missing => LiteralKind::Missing,
            TokenKind::Infinity => LiteralKind::Infinity,
            TokenKind::NaN => LiteralKind::NaN,
            _ => return None,
        })
    }
}

/// Any operator application: prefix, infix, call, index, member access or
/// a parenthesized group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Operator {
    pub kind: OperatorKind,
    pub unary: bool,
    /// The operator token, or the opening bracket for calls, indexing and groups.
    pub op_span: Span,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    /// Closing bracket for calls, indexing and groups when present.
    pub close: Option<Span>,
}

impl Operator {
    pub fn binary(kind: OperatorKind, op_span: Span, left: NodeId, right: NodeId) -> Operator {
        Operator {
            kind,
            unary: false,
            op_span,
            left: Some(left),
            right: Some(right),
            close: None,
        }
    }

    pub fn prefix(kind: OperatorKind, op_span: Span, operand: NodeId) -> Operator {
        Operator {
            kind,
            unary: true,
            op_span,
            left: None,
            right: Some(operand),
            close: None,
        }
    }

    pub fn is_unary(&self) -> bool {
        self.unary
    }

    pub fn precedence(&self) -> u8 {
        self.kind.precedence()
    }

    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ArgumentKind {
    Expression(NodeId),
    Named {
        name: Span,
        equals: Span,
        value: Option<NodeId>,
    },
    /// Nothing between two separators, as in `x[, 1]`.
    Missing,
    /// Tokens that could not be turned into an argument expression.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub kind: ArgumentKind,
    pub comma: Option<Span>,
}

impl Argument {
    pub fn value(&self) -> Option<NodeId> {
        match &self.kind {
            ArgumentKind::Expression(expr) => Some(*expr),
            ArgumentKind::Named { value, .. } => *value,
            ArgumentKind::Missing | ArgumentKind::Error => None,
        }
    }

    pub fn name(&self) -> Option<Span> {
        match &self.kind {
            ArgumentKind::Named { name, .. } => Some(*name),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArgumentList {
    pub open: Span,
    pub close: Option<Span>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionDefinition {
    pub keyword: Span,
    pub arguments: Option<NodeId>,
    pub body: Option<NodeId>,
}

/// A braced block, or a single-statement body when `open` is `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub open: Option<Span>,
    pub close: Option<Span>,
}

impl Scope {
    pub fn is_simple(&self) -> bool {
        self.open.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    GlobalScope,
    Scope(Scope),
    Statement(Statement),
    Operator(Operator),
    Variable,
    Literal(LiteralKind),
    FunctionDefinition(FunctionDefinition),
    ArgumentList(ArgumentList),
    Argument(Argument),
    /// Placeholder for a token that could not be used where it appeared.
    Error,
}

impl NodeKind {
    pub fn desc(&self) -> &'static str {
        match self {
            NodeKind::GlobalScope => "global scope",
            NodeKind::Scope(_) => "scope",
            NodeKind::Statement(stmt) => stmt.kind.desc(),
            NodeKind::Operator(_) => "operator",
            NodeKind::Variable => "variable",
            NodeKind::Literal(_) => "literal",
            NodeKind::FunctionDefinition(_) => "function definition",
            NodeKind::ArgumentList(_) => "argument list",
            NodeKind::Argument(_) => "argument",
            NodeKind::Error => "error",
        }
    }

    pub fn is_scope(&self) -> bool {
        matches!(self, NodeKind::GlobalScope | NodeKind::Scope(_))
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            NodeKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            NodeKind::Statement(stmt) => Some(stmt),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Append-only node storage used while parsing. A node is only allocated
/// once all of its children exist, and allocating it links them up, so a
/// node's parent is set exactly once.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub(crate) fn alloc(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in children.iter() {
            let node = &mut self.nodes[child.index()];
            debug_assert!(node.parent.is_none(), "node {} already has a parent", child);
            node.parent = Some(id);
        }
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
            children,
        });
        id
    }

    pub(crate) fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

/// The parsed tree of a single text buffer along with the tokens it was
/// built from and every error found while building it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
    #[serde(skip)]
    tokens: TokenList,
    #[serde(skip)]
    comments: Vec<Token>,
    #[serde(skip)]
    text: String,
    errors: Vec<ParseError>,
}

impl Ast {
    pub(crate) fn new(
        nodes: Vec<Node>,
        root: NodeId,
        tokens: TokenList,
        text: String,
        errors: Vec<ParseError>,
    ) -> Ast {
        Ast {
            nodes,
            root,
            tokens,
            comments: vec![],
            text,
            errors,
        }
    }

    pub(crate) fn set_comments(&mut self, comments: Vec<Token>) {
        self.comments = comments;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Top level statements.
    pub fn statements(&self) -> &[NodeId] {
        self.children(self.root)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span_text(&self, span: Span) -> &str {
        self.text.get(span.start..span.end).unwrap_or("")
    }

    pub fn node_text(&self, id: NodeId) -> &str {
        self.span_text(self.span(id))
    }

    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    /// Comment tokens, when the tree was built from raw text.
    pub fn comments(&self) -> &[Token] {
        &self.comments
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// True when at least one error (not just warnings) was recorded.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| e.is_error())
    }
}
