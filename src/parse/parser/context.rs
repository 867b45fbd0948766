use crate::parse::{Parser, Restrictions};

/// The grammar context the parser is currently in.
#[derive(Clone, Debug)]
pub struct ParseContext {
    pub restrictions: Restrictions,
    pub description: Option<&'static str>,
    /// Current nesting of expressions and statements.
    pub depth: usize,
}

impl ParseContext {
    pub fn new() -> ParseContext {
        ParseContext {
            restrictions: Restrictions::empty(),
            description: None,
            depth: 0,
        }
    }
}

impl Default for ParseContext {
    fn default() -> ParseContext {
        ParseContext::new()
    }
}

pub(crate) enum Undo {
    Restrictions(Restrictions),
    Description(Option<&'static str>),
}

/// A temporary change of `ParseContext` that is rolled back when the
/// frame is dropped.
pub(crate) struct ParseFrame<'a, 'src> {
    p: &'a mut Parser<'src>,
    undo: Vec<Undo>,
}

impl<'a, 'src> std::ops::Deref for ParseFrame<'a, 'src> {
    type Target = Parser<'src>;
    fn deref(&self) -> &Self::Target {
        self.p
    }
}

impl<'a, 'src> std::ops::DerefMut for ParseFrame<'a, 'src> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.p
    }
}

impl<'a, 'src> ParseFrame<'a, 'src> {
    pub fn with_restrictions(mut self, r: Restrictions) -> Self {
        self.undo.push(Undo::Restrictions(self.p.ctx.restrictions));
        self.p.ctx.restrictions |= r;
        self
    }

    pub fn without_restrictions(mut self, r: Restrictions) -> Self {
        self.undo.push(Undo::Restrictions(self.p.ctx.restrictions));
        self.p.ctx.restrictions.remove(r);
        self
    }

    pub fn with_description(mut self, desc: &'static str) -> Self {
        log::debug!("new context: {}", desc);
        self.undo.push(Undo::Description(self.p.ctx.description));
        self.p.ctx.description = Some(desc);
        self
    }
}

impl<'a, 'src> Drop for ParseFrame<'a, 'src> {
    fn drop(&mut self) {
        while let Some(u) = self.undo.pop() {
            match u {
                Undo::Restrictions(prev) => self.p.ctx.restrictions = prev,
                Undo::Description(prev) => self.p.ctx.description = prev,
            }
        }
    }
}

impl<'src> Parser<'src> {
    pub(crate) fn frame(&mut self) -> ParseFrame<'_, 'src> {
        ParseFrame {
            p: self,
            undo: vec![],
        }
    }

    /// Runs `f` one nesting level deeper, or reports `NestingTooDeep` at
    /// the current token and returns `None` once `max_depth` is reached.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Parser<'src>) -> T) -> Option<T> {
        if self.ctx.depth >= self.options.max_depth {
            log::debug!("nesting limit {} reached", self.options.max_depth);
            self.error_at_current(crate::errors::ParseErrorKind::NestingTooDeep);
            return None;
        }
        self.ctx.depth += 1;
        let result = f(self);
        self.ctx.depth -= 1;
        Some(result)
    }
}

#[cfg(test)]
mod context_tests {
    use crate::{
        ast::token::TokenList,
        parse::{ParseOptions, Parser, Restrictions},
    };

    #[test]
    fn frames_restore_on_drop() {
        let tokens = TokenList::new(vec![]);
        let options = ParseOptions::default();
        let mut parser = Parser::new("", &tokens, &options);
        {
            let mut p = parser
                .frame()
                .with_restrictions(Restrictions::IN_GROUP | Restrictions::IN_ARGUMENTS)
                .with_description("call arguments");
            assert!(p.context().restrictions.contains(Restrictions::IN_GROUP));
            assert_eq!(p.context().description, Some("call arguments"));
            {
                let q = p
                    .frame()
                    .with_restrictions(Restrictions::IN_CURLY)
                    .without_restrictions(Restrictions::IN_GROUP);
                assert_eq!(
                    q.context().restrictions,
                    Restrictions::IN_CURLY | Restrictions::IN_ARGUMENTS
                );
            }
            assert_eq!(
                p.context().restrictions,
                Restrictions::IN_GROUP | Restrictions::IN_ARGUMENTS
            );
        }
        assert!(parser.context().restrictions.is_empty());
        assert_eq!(parser.context().description, None);
    }
}
