// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod codegen;
pub mod frame;

pub use codegen::*;
pub use frame::*;
