use serde::Serialize;

use crate::{
    ast::{token::Keyword, NodeId},
    span::Span,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub kind: StatementKind,
    /// The `;` that terminated this statement, if any.
    pub semicolon: Option<Span>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IfStatement {
    pub keyword: Span,
    pub open: Option<Span>,
    pub condition: Option<NodeId>,
    pub close: Option<Span>,
    pub body: Option<NodeId>,
    pub else_keyword: Option<Span>,
    pub else_body: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForStatement {
    pub keyword: Span,
    pub open: Option<Span>,
    pub variable: Option<NodeId>,
    pub in_keyword: Option<Span>,
    pub sequence: Option<NodeId>,
    pub close: Option<Span>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WhileStatement {
    pub keyword: Span,
    pub open: Option<Span>,
    pub condition: Option<NodeId>,
    pub close: Option<Span>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RepeatStatement {
    pub keyword: Span,
    pub body: Option<NodeId>,
}

/// `return(...)`, `typeof(...)`, `library(...)` or `require(...)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeywordCall {
    pub keyword: Keyword,
    pub keyword_span: Span,
    pub arguments: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum StatementKind {
    Expression { expr: Option<NodeId> },
    If(IfStatement),
    For(ForStatement),
    While(WhileStatement),
    Repeat(RepeatStatement),
    Break { keyword: Span },
    Next { keyword: Span },
    KeywordCall(KeywordCall),
    Empty,
}

impl StatementKind {
    pub fn desc(&self) -> &'static str {
        match self {
            StatementKind::Expression { .. } => "expression statement",
            StatementKind::If(_) => "if statement",
            StatementKind::For(_) => "for statement",
            StatementKind::While(_) => "while statement",
            StatementKind::Repeat(_) => "repeat statement",
            StatementKind::Break { .. } => "break statement",
            StatementKind::Next { .. } => "next statement",
            StatementKind::KeywordCall(_) => "keyword call",
            StatementKind::Empty => "empty statement",
        }
    }

    /// Child nodes in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let slots: Vec<Option<NodeId>> = match self {
            StatementKind::Expression { expr } => vec![*expr],
            StatementKind::If(s) => vec![s.condition, s.body, s.else_body],
            StatementKind::For(s) => vec![s.variable, s.sequence, s.body],
            StatementKind::While(s) => vec![s.condition, s.body],
            StatementKind::Repeat(s) => vec![s.body],
            StatementKind::KeywordCall(s) => vec![s.arguments],
            StatementKind::Break { .. } | StatementKind::Next { .. } | StatementKind::Empty => {
                vec![]
            }
        };
        slots.into_iter().flatten().collect()
    }
}
