// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod builder;
pub mod config;
mod ctx;

pub use config::*;
pub use ctx::*;
