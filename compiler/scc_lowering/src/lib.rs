// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod fn_ctx;
mod lowerer;

pub use lowerer::*;
