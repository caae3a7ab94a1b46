// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod ir_instr;
pub mod ir_ops;

pub use ir_instr::*;
pub use ir_ops::*;
