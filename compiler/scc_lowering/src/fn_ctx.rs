// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_symbol::{SymbolId, FUNC_BODY_LEVEL};

/// Holds function-specific context during AST-to-IR conversion.
#[derive(Debug, Default)]
pub struct FnCtx {
    /// Counter for generating fresh temporary names.
    temp_counter: usize,

    /// One buffer per compound block being lowered; the last one is the
    /// innermost.
    temp_buffers: Vec<Vec<SymbolId>>,
}

impl FnCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope level of the innermost open block.
    pub fn level(&self) -> usize {
        FUNC_BODY_LEVEL + self.temp_buffers.len().saturating_sub(1)
    }

    pub fn enter_block(&mut self) {
        self.temp_buffers.push(vec![]);
    }

    /// Closes the innermost block and hands back the temporaries created
    /// while it was open.
    pub fn exit_block(&mut self) -> Option<Vec<SymbolId>> {
        self.temp_buffers.pop()
    }

    pub fn next_temp_name(&mut self) -> String {
        let name = format!("%t{}", self.temp_counter);
        self.temp_counter += 1;
        name
    }

    /// Adds `id` to the innermost block. Returns `false` when no block is
    /// open.
    pub fn record_temp(&mut self, id: SymbolId) -> bool {
        match self.temp_buffers.last_mut() {
            Some(buffer) => {
                buffer.push(id);
                true
            }
            None => false,
        }
    }

    pub fn temp_count(&self) -> usize {
        self.temp_counter
    }
}
