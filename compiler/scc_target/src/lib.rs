// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod asm;
pub mod reg;

pub use asm::*;
pub use reg::*;
