use crate::{
    ast::{Ast, NodeId},
    span::Span,
};

/// Pre-order walk over a subtree, children visited in source order.
pub struct Descendants<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        for child in self.ast.children(id).iter().rev() {
            self.stack.push(*child);
        }
        Some(id)
    }
}

/// Walks from a node up to the root, starting with the node's parent.
pub struct Ancestors<'a> {
    ast: &'a Ast,
    curr: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.curr?;
        self.curr = self.ast.parent(id);
        Some(id)
    }
}

impl Ast {
    /// The node itself followed by every node below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            ast: self,
            stack: vec![id],
        }
    }

    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            curr: self.parent(id),
        }
    }

    /// Nearest braced, simple or global scope containing `id`.
    pub fn enclosing_scope(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|a| self.kind(*a).is_scope())
    }

    /// The deepest node whose range contains `offset`. Falls back to the
    /// root when no statement covers it.
    pub fn node_at(&self, offset: usize) -> NodeId {
        let mut curr = self.root();
        'descend: loop {
            for child in self.children(curr) {
                if self.span(*child).contains(offset) {
                    curr = *child;
                    continue 'descend;
                }
            }
            return curr;
        }
    }

    /// The deepest node that starts exactly at `offset`.
    pub fn node_starting_at(&self, offset: usize) -> Option<NodeId> {
        self.deepest(
            |span| span.start == offset,
            |span| span.start <= offset && offset < span.end.max(span.start + 1),
        )
    }

    /// The deepest node that ends exactly at `offset`.
    pub fn node_ending_at(&self, offset: usize) -> Option<NodeId> {
        self.deepest(
            |span| span.end == offset,
            |span| span.start < offset && offset <= span.end,
        )
    }

    /// Outermost nodes lying completely inside `range`, in source order.
    pub fn nodes_in_range(&self, range: Span) -> Vec<NodeId> {
        let mut found = vec![];
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let span = self.span(id);
            if id != self.root() && range.contains_span(&span) {
                found.push(id);
                continue;
            }
            if span.end <= range.start || span.start >= range.end {
                continue;
            }
            for child in self.children(id).iter().rev() {
                stack.push(*child);
            }
        }
        found
    }

    fn deepest(
        &self,
        matches: impl Fn(&Span) -> bool,
        covers: impl Fn(&Span) -> bool,
    ) -> Option<NodeId> {
        let mut best = None;
        let mut curr = self.root();
        if matches(&self.span(curr)) {
            best = Some(curr);
        }
        'descend: loop {
            for child in self.children(curr) {
                let span = self.span(*child);
                if covers(&span) {
                    if matches(&span) {
                        best = Some(*child);
                    }
                    curr = *child;
                    continue 'descend;
                }
            }
            return best;
        }
    }
}

#[cfg(test)]
mod walk_tests {
    use crate::{ast::NodeKind, parse::parse_source, span::Span};

    #[test]
    fn descendants_are_pre_order() {
        let ast = parse_source("x <- f(a, 1)");
        let kinds = ast
            .descendants(ast.root())
            .map(|id| ast.kind(id).desc())
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                "global scope",
                "expression statement",
                "operator",
                "variable",
                "operator",
                "variable",
                "argument list",
                "argument",
                "variable",
                "argument",
                "literal",
            ]
        );
    }

    #[test]
    fn lookup_by_position() {
        let text = "x <- foo(bar)";
        let ast = parse_source(text);
        let at = ast.node_at(10);
        assert_eq!(ast.node_text(at), "bar");
        assert!(matches!(ast.kind(at), NodeKind::Variable));

        let start = ast.node_starting_at(5).unwrap();
        assert_eq!(ast.node_text(start), "foo");
        let end = ast.node_ending_at(text.len()).unwrap();
        assert_eq!(ast.node_text(end), "(bar)");

        let scope = ast.enclosing_scope(at).unwrap();
        assert_eq!(scope, ast.root());
        assert!(ast.ancestors(at).any(|a| a == ast.root()));
    }

    #[test]
    fn enclosing_scope_of_function_body() {
        let ast = parse_source("f <- function(x) {\n  y <- x\n}");
        let y = ast.node_at(21);
        assert_eq!(ast.node_text(y), "y");
        let scope = ast.enclosing_scope(y).unwrap();
        assert!(ast.node_text(scope).starts_with('{'));
        assert_eq!(ast.enclosing_scope(scope), Some(ast.root()));
    }

    #[test]
    fn range_query() {
        let ast = parse_source("a <- 1\nb <- 2\nc <- 3");
        let found = ast.nodes_in_range(Span::new(0, 13));
        let texts = found.iter().map(|id| ast.node_text(*id)).collect::<Vec<_>>();
        assert_eq!(texts, vec!["a <- 1", "b <- 2"]);
    }
}
