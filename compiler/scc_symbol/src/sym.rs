// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_types::Ty;

/// Index of a symbol inside the [`SymbolTable`](crate::SymbolTable) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

/// File scope.
pub const GLOBAL_LEVEL: usize = 0;

/// Parameter scope of the innermost enclosing function.
pub const PARAM_LEVEL: usize = 1;

/// Outermost block of a function body.
pub const FUNC_BODY_LEVEL: usize = 2;

/// What a name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
    Prototype,

    /// Compiler-introduced storage, never bound to a source name.
    Temporary,
}

impl SymbolKind {
    pub fn is_callable(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Prototype)
    }

    pub fn is_object(self) -> bool {
        matches!(self, SymbolKind::Variable | SymbolKind::Parameter | SymbolKind::Temporary)
    }
}

/// A declaration record, shared by index from every AST and IR node that
/// refers to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// The name of the symbol.
    pub name: String,

    /// 0 = file scope, 1 = parameters, 2 and up = block depth.
    pub level: usize,

    pub kind: SymbolKind,

    pub ty: Ty,

    /// Frame-pointer-relative byte offset; stays `None` until frame layout
    /// runs, and for globals forever.
    pub offset: Option<i32>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, level: usize, kind: SymbolKind, ty: Ty) -> Self {
        Self {
            name: name.into(),
            level,
            kind,
            ty,
            offset: None,
        }
    }

    /// Globals are addressed through their label; everything else through
    /// the frame pointer.
    pub fn is_global(&self) -> bool {
        self.level == GLOBAL_LEVEL && self.kind != SymbolKind::Temporary
    }

    pub fn is_array(&self) -> bool {
        self.ty.is_array()
    }
}
