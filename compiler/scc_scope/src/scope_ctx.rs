// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_symbol::{SymbolId, FUNC_BODY_LEVEL, GLOBAL_LEVEL, PARAM_LEVEL};

use crate::env::Env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeType {
    /// Parameter list of a function declarator.
    Params,

    /// Compound statement.
    Block,
}

/// Tracks the live environment and its scope level while the resolver
/// walks the tree. Opening a scope snapshots the current environment;
/// closing it restores the snapshot.
#[derive(Debug, Clone)]
pub struct ScopeCtx {
    current: Env,
    level: usize,
    saved: Vec<(Env, usize)>,
}

impl ScopeCtx {
    pub fn new(globals: Env) -> Self {
        Self {
            current: globals,
            level: GLOBAL_LEVEL,
            saved: vec![],
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.current.lookup(name)
    }

    pub fn declare(&mut self, name: impl Into<String>, id: SymbolId) {
        self.current.add(name, id);
    }

    pub fn env(&self) -> &Env {
        &self.current
    }

    /// Opens a scope and returns its level.
    pub fn enter(&mut self, ty: ScopeType) -> usize {
        let snapshot = self.current.fork();
        self.saved.push((snapshot, self.level));
        self.level = match ty {
            ScopeType::Params => PARAM_LEVEL,
            ScopeType::Block => (self.level + 1).max(FUNC_BODY_LEVEL),
        };
        self.level
    }

    /// Closes the innermost scope, returning the environment it had built.
    /// `None` when no scope is open.
    pub fn exit(&mut self) -> Option<Env> {
        let (snapshot, level) = self.saved.pop()?;
        self.level = level;
        Some(std::mem::replace(&mut self.current, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_follow_nesting() {
        let mut scope = ScopeCtx::new(Env::new());
        assert_eq!(scope.level(), 0);
        assert_eq!(scope.enter(ScopeType::Params), 1);
        assert_eq!(scope.enter(ScopeType::Block), 2);
        assert_eq!(scope.enter(ScopeType::Block), 3);
        scope.exit();
        assert_eq!(scope.enter(ScopeType::Block), 3);
        scope.exit();
        scope.exit();
        assert_eq!(scope.level(), 1);
    }

    #[test]
    fn test_exit_restores_snapshot() {
        let mut globals = Env::new();
        globals.add("g", SymbolId(0));
        let mut scope = ScopeCtx::new(globals);

        scope.enter(ScopeType::Block);
        scope.declare("local", SymbolId(1));
        scope.declare("g", SymbolId(2));
        let inner = scope.exit();

        assert!(inner.is_some_and(|env| env.contains("local")));
        assert_eq!(scope.lookup("g"), Some(SymbolId(0)));
        assert_eq!(scope.lookup("local"), None);
        assert!(scope.exit().is_none());
    }
}
