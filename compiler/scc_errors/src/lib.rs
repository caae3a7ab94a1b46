// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod code;
pub mod diagnostic;

pub use code::ErrCode;
pub use diagnostic::*;
