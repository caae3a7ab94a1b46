// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod resolver;
pub mod ty_checker;

mod analyzer;
pub use analyzer::*;
