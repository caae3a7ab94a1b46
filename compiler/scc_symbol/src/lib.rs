// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod builtin;
mod sym;
mod symbol_table;

pub use builtin::*;
pub use sym::*;
pub use symbol_table::*;
