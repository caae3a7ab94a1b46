// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_errors::DiagnosticBag;
use scc_symbol::{Symbol, SymbolId, SymbolTable};

use crate::config::CompilerConfig;

/// State shared by every stage of one compilation.
#[derive(Debug, Default)]
pub struct CompilerCtx {
    pub config: CompilerConfig,

    pub symbols: SymbolTable,

    /// Non-fatal findings; errors abort through `Result` instead.
    pub diagnostics: DiagnosticBag,
}

impl CompilerCtx {
    pub fn new(config: CompilerConfig, symbols: SymbolTable, diagnostics: DiagnosticBag) -> Self {
        Self { config, symbols, diagnostics }
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }
}
