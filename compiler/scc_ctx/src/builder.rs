// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::cell::RefCell;
use std::rc::Rc;

use scc_errors::DiagnosticBag;
use scc_symbol::SymbolTable;

use crate::{CompilerConfig, CompilerCtx};

#[derive(Debug, Default)]
pub struct CompilerCtxBuilder {
    config: Option<CompilerConfig>,
    symbols: Option<SymbolTable>,
    diagnostics: Option<DiagnosticBag>,
}

impl CompilerCtxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: CompilerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = Some(symbols);
        self
    }

    pub fn diagnostics(mut self, diags: DiagnosticBag) -> Self {
        self.diagnostics = Some(diags);
        self
    }

    pub fn build(self) -> CompilerCtx {
        CompilerCtx::new(
            self.config.unwrap_or_default(),
            self.symbols.unwrap_or_default(),
            self.diagnostics.unwrap_or_default(),
        )
    }

    /// Builds the context already wrapped for sharing between stages.
    pub fn build_shared(self) -> Rc<RefCell<CompilerCtx>> {
        Rc::new(RefCell::new(self.build()))
    }
}
