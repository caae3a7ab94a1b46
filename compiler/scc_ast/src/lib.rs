// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod ast_node;
mod expr;
mod operation;
mod stmt;
pub mod build;

pub use ast_node::*;
pub use expr::*;
pub use operation::*;
pub use stmt::*;
