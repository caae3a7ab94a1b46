// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use crate::{Symbol, SymbolId};

/// Arena owning every symbol created during one compilation. Symbols are
/// never removed; the only mutation after creation is the one-time frame
/// offset assignment.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, sym: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        self.symbols.push(sym);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    /// Records the frame offset of `id`.
    ///
    /// Returns `false` when the symbol does not exist or already has an
    /// offset.
    pub fn assign_offset(&mut self, id: SymbolId, offset: i32) -> bool {
        match self.symbols.get_mut(id.0) {
            Some(sym) if sym.offset.is_none() => {
                sym.offset = Some(offset);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(idx, sym)| (SymbolId(idx), sym))
    }
}

#[cfg(test)]
mod tests {
    use scc_types::Ty;

    use super::*;
    use crate::SymbolKind;

    #[test]
    fn test_ids_are_dense_and_stable() {
        let mut table = SymbolTable::new();
        let a = table.declare(Symbol::new("a", 0, SymbolKind::Variable, Ty::Int));
        let b = table.declare(Symbol::new("b", 2, SymbolKind::Variable, Ty::Int));
        assert_eq!(a, SymbolId(0));
        assert_eq!(b, SymbolId(1));
        assert_eq!(table.get(b).map(|s| s.name.as_str()), Some("b"));
    }

    #[test]
    fn test_offset_is_written_once() {
        let mut table = SymbolTable::new();
        let t = table.declare(Symbol::new("%t0", 2, SymbolKind::Temporary, Ty::Int));
        assert!(table.assign_offset(t, -4));
        assert!(!table.assign_offset(t, -8));
        assert_eq!(table.get(t).and_then(|s| s.offset), Some(-4));
    }

    #[test]
    fn test_temporaries_are_never_global() {
        let temp = Symbol::new("%t0", 0, SymbolKind::Temporary, Ty::Int);
        let global = Symbol::new("g", 0, SymbolKind::Variable, Ty::Int);
        assert!(!temp.is_global());
        assert!(global.is_global());
    }
}
