use itertools::Itertools;

use crate::ast::{ArgumentKind, Ast, NodeId, NodeKind, OperatorKind, StatementKind};

impl Ast {
    /// Renders a subtree as an s-expression, e.g. `(<- x (+ a b))`.
    pub fn sexpr(&self, id: NodeId) -> String {
        let node = self.node(id);
        match &node.kind {
            NodeKind::GlobalScope => self.list("global", &node.children),
            NodeKind::Scope(scope) if scope.is_simple() => match node.children.first() {
                Some(stmt) => self.sexpr(*stmt),
                None => "()".to_string(),
            },
            NodeKind::Scope(_) => self.list("block", &node.children),
            NodeKind::Statement(stmt) => match &stmt.kind {
                StatementKind::Expression { expr: Some(expr) } => self.sexpr(*expr),
                StatementKind::Expression { expr: None } => "<missing>".to_string(),
                StatementKind::If(_) => self.list("if", &node.children),
                StatementKind::For(_) => self.list("for", &node.children),
                StatementKind::While(_) => self.list("while", &node.children),
                StatementKind::Repeat(_) => self.list("repeat", &node.children),
                StatementKind::Break { .. } => "break".to_string(),
                StatementKind::Next { .. } => "next".to_string(),
                StatementKind::KeywordCall(call) => {
                    let args = call
                        .arguments
                        .map(|args| self.node(args).children.clone())
                        .unwrap_or_default();
                    self.list(call.keyword.as_str(), &args)
                }
                StatementKind::Empty => ";".to_string(),
            },
            NodeKind::Operator(op) => {
                let head = match op.kind {
                    OperatorKind::FunctionCall => "call".to_string(),
                    OperatorKind::Group => "paren".to_string(),
                    _ => self.span_text(op.op_span).to_string(),
                };
                let mut operands = vec![];
                for child in node.children.iter() {
                    match &self.node(*child).kind {
                        // call and index arguments are spliced in
                        NodeKind::ArgumentList(_) => {
                            operands.extend(self.node(*child).children.iter().copied())
                        }
                        _ => operands.push(*child),
                    }
                }
                self.list(&head, &operands)
            }
            NodeKind::Variable | NodeKind::Literal(_) => self.node_text(id).to_string(),
            NodeKind::FunctionDefinition(func) => {
                let formals = match func.arguments {
                    Some(args) => format!(
                        "({})",
                        self.node(args)
                            .children
                            .iter()
                            .map(|arg| self.sexpr(*arg))
                            .join(" ")
                    ),
                    None => "()".to_string(),
                };
                match func.body {
                    Some(body) => format!("(function {} {})", formals, self.sexpr(body)),
                    None => format!("(function {})", formals),
                }
            }
            NodeKind::ArgumentList(_) => self.list("args", &node.children),
            NodeKind::Argument(arg) => match &arg.kind {
                ArgumentKind::Expression(expr) => self.sexpr(*expr),
                ArgumentKind::Named { name, value, .. } => match value {
                    Some(value) => {
                        format!("(= {} {})", self.span_text(*name), self.sexpr(*value))
                    }
                    None => format!("(= {})", self.span_text(*name)),
                },
                ArgumentKind::Missing => "_".to_string(),
                ArgumentKind::Error => "<error>".to_string(),
            },
            NodeKind::Error => format!("<error {}>", self.node_text(id)),
        }
    }

    fn list(&self, head: &str, items: &[NodeId]) -> String {
        if items.is_empty() {
            format!("({})", head)
        } else {
            format!("({} {})", head, items.iter().map(|i| self.sexpr(*i)).join(" "))
        }
    }

    /// Indented one-node-per-line listing of the whole tree.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            let detail = match &node.kind {
                NodeKind::Operator(op) => format!(" {:?}", op.kind),
                NodeKind::Literal(kind) => format!(" {:?} {}", kind, self.node_text(id)),
                NodeKind::Variable | NodeKind::Error => format!(" {}", self.node_text(id)),
                _ => String::new(),
            };
            out.push_str(&format!(
                "{}{}{} {}\n",
                "  ".repeat(depth),
                node.kind.desc(),
                detail,
                node.span
            ));
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }
}
