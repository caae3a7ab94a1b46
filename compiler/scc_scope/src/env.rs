// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexMap;
use scc_symbol::SymbolId;

/// Name-to-symbol mapping of one lexical scope.
///
/// A nested scope starts as a full copy of its parent, so whatever it binds
/// disappears together with it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Env {
    ids: IndexMap<String, SymbolId>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of `self` to be used by a nested scope.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    /// Binds `name`, replacing any visible binding of the same name.
    pub fn add(&mut self, name: impl Into<String>, id: SymbolId) {
        self.ids.insert(name.into(), id);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Bindings in the order their names were first bound.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.ids.iter().map(|(name, id)| (name.as_str(), *id))
    }
}
