// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod type_;

pub use type_::*;

/// Size of a machine word in bytes. Every scalar occupies exactly one word.
pub const WORD_SIZE: usize = 4;
