//! The scope stack

use itertools::Itertools;
use std::fmt::{Display, Formatter};
use tracing::debug;
use unic_units::ScopeKind;

/// A stack of open scopes. The outermost scope is always present and can't be popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeStack {
    root: ScopeKind,
    nested: Vec<ScopeKind>,
}

impl ScopeStack {
    /// Creates a stack whose outermost scope has the grammar of a function body
    pub fn new() -> Self {
        Self {
            root: ScopeKind::FunctionBody,
            nested: vec![],
        }
    }

    /// The innermost open scope
    pub fn current(&self) -> ScopeKind {
        self.nested.last().copied().unwrap_or(self.root)
    }

    /// Number of open scopes, including the outermost one
    pub fn depth(&self) -> usize {
        self.nested.len() + 1
    }

    pub fn push(&mut self, scope: ScopeKind) {
        debug!(%scope, depth = self.depth() + 1, "push scope");
        self.nested.push(scope);
    }

    /// Pops the innermost scope, unless only the outermost scope is left
    pub fn pop(&mut self) -> Option<ScopeKind> {
        let popped = self.nested.pop();
        if let Some(scope) = popped {
            debug!(%scope, depth = self.depth(), "pop scope");
        }
        popped
    }

    /// Pops the innermost scope if it is `scope`
    pub fn pop_if(&mut self, scope: ScopeKind) -> Option<ScopeKind> {
        if self.nested.last() == Some(&scope) {
            self.pop()
        } else {
            None
        }
    }

    /// Turns the innermost scope into its body scope if it is a head scope, returning the head
    pub fn promote_head(&mut self) -> Option<ScopeKind> {
        let scope = self.nested.last_mut().filter(|scope| scope.is_head())?;
        let head = *scope;
        *scope = head.body();
        debug!(%head, body = %scope, "scope head becomes body");
        Some(head)
    }

    /// Open scopes above the outermost one, innermost first
    pub fn open(&self) -> impl Iterator<Item = ScopeKind> + '_ {
        self.nested.iter().rev().copied()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ScopeStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            std::iter::once(self.root).chain(self.nested.iter().copied()).join(", ")
        )
    }
}
