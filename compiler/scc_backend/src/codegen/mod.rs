// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_errors::Diagnostic;
use scc_ir::IrItem;
use scc_target::AsmInstr;

mod mips;

pub use mips::*;

pub type CodegenResult<T = ()> = Result<T, Diagnostic>;

/// Turns a laid-out program into target instructions.
pub trait CodeGenerator {
    fn gen_program(&mut self, items: &[IrItem]) -> CodegenResult<Vec<AsmInstr>>;
}
