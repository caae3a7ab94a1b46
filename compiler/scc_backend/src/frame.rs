// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Frame layout.
//!
//! ```text
//!   higher addresses
//!   +----------------+ <- caller's $sp
//!   | param n-1      |   $fp + 4n
//!   | ...            |
//!   | param 0        |   $fp + 4
//!   | local 0        |   $fp + 0
//!   | ...            |
//!   | local k        |   $fp - (localSize - 4)
//!   | saved $ra      |   $sp + 4
//!   | saved $fp      |   $sp + 0
//!   +----------------+ <- $sp
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use scc_ctx::CompilerCtx;
use scc_errors::{Diagnostic, ErrCode};
use scc_ir::{FrameInfo, IrBlock, IrFunction};
use scc_symbol::SymbolId;
use scc_types::WORD_SIZE;
use scc_utils::bug;

pub type FrameResult<T = ()> = Result<T, Diagnostic>;

/// Bytes used by the saved `$fp` and `$ra`.
pub const SAVED_REGS_SIZE: usize = 2 * WORD_SIZE;

/// Hands out downward-growing local offsets.
#[derive(Debug, Clone, Default)]
pub struct OffsetGenerator {
    cursor: i32,
}

impl OffsetGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `size` bytes and returns the offset of their lowest word,
    /// or `None` once the frame no longer fits 32-bit offsets.
    pub fn next(&mut self, size: usize) -> Option<i32> {
        let size = i32::try_from(size).ok()?;
        self.cursor = self.cursor.checked_sub(size)?;
        Some(self.cursor + WORD_SIZE as i32)
    }

    pub fn total_space_used(&self) -> usize {
        self.cursor.unsigned_abs() as usize
    }
}

/// Offset of parameter `idx`, relative to `$fp`.
pub fn param_offset(idx: usize) -> i32 {
    let off = WORD_SIZE * (idx + 1);
    i32::try_from(off).unwrap_or_else(|_| bug!("parameter {idx} out of frame range"))
}

/// Assigns every parameter, local and temporary of a function its frame
/// offset. Storage is never shared, not even between sibling blocks.
pub struct FrameLayout {
    ctx: Rc<RefCell<CompilerCtx>>,
}

impl FrameLayout {
    pub fn new(ctx: Rc<RefCell<CompilerCtx>>) -> Self {
        Self { ctx }
    }

    pub fn assign(&mut self, func: &mut IrFunction) -> FrameResult<FrameInfo> {
        for (idx, param) in func.params.iter().enumerate() {
            self.set_offset(*param, param_offset(idx))?;
        }

        let mut offsets = OffsetGenerator::new();
        self.assign_block(func, &func.body, &mut offsets)?;
        for block in func.body.nested_blocks() {
            self.assign_block(func, block, &mut offsets)?;
        }

        let local_size = offsets.total_space_used();
        let frame_size = (WORD_SIZE * func.params.len())
            .checked_add(local_size + SAVED_REGS_SIZE)
            .filter(|size| i32::try_from(*size).is_ok())
            .ok_or_else(|| self.frame_too_large(func))?;
        let info = FrameInfo { local_size, frame_size };
        debug!(
            "frame of {:?}: {} local bytes, {} total",
            func.sym, info.local_size, info.frame_size
        );
        func.frame = Some(info);
        Ok(info)
    }

    fn assign_block(&mut self, func: &IrFunction, block: &IrBlock, offsets: &mut OffsetGenerator) -> FrameResult {
        for decl in &block.decls {
            let size = match self.ctx.borrow().symbol(*decl) {
                Some(sym) => sym.ty.storage_size(),
                None => return Err(Diagnostic::internal(None, format!("unknown symbol {decl:?}"))),
            };
            let offset = size
                .and_then(|size| offsets.next(size))
                .ok_or_else(|| self.frame_too_large(func))?;
            self.set_offset(*decl, offset)?;
        }
        Ok(())
    }

    fn frame_too_large(&self, func: &IrFunction) -> Diagnostic {
        let name = self
            .ctx
            .borrow()
            .symbol(func.sym)
            .map_or_else(|| format!("{:?}", func.sym), |sym| sym.name.clone());
        Diagnostic::structural_error(ErrCode::STR5001, format!("stack frame of '{name}' is too large"))
    }

    fn set_offset(&mut self, id: SymbolId, offset: i32) -> FrameResult {
        if !self.ctx.borrow_mut().symbols.assign_offset(id, offset) {
            return Err(Diagnostic::internal(None, format!("frame offset of {id:?} assigned twice")));
        }
        Ok(())
    }
}
