// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use lazy_static::lazy_static;
use scc_types::Ty;

use crate::{Symbol, SymbolKind, GLOBAL_LEVEL};

/// Name of the built-in output routine.
pub const BUILTIN_PRINT: &str = "print";

/// A function bound at file scope before resolution starts.
#[derive(Debug, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub ty: Ty,
}

impl Builtin {
    pub fn to_symbol(&self) -> Symbol {
        Symbol::new(self.name, GLOBAL_LEVEL, SymbolKind::Function, self.ty.clone())
    }
}

lazy_static! {
    pub static ref BUILTINS: Vec<Builtin> = vec![
        Builtin {
            name: BUILTIN_PRINT,
            ty: Ty::function(Ty::Void, vec![Ty::Int]),
        },
    ];
}

/// Whether `sym` is the built-in `print` routine.
pub fn is_builtin_print(sym: &Symbol) -> bool {
    sym.name == BUILTIN_PRINT && sym.level == GLOBAL_LEVEL && sym.kind == SymbolKind::Function
}
