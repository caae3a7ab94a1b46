// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod env;
pub mod scope_ctx;

pub use env::*;
pub use scope_ctx::*;
