// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod internals;

#[doc(hidden)]
pub use log as __log;
