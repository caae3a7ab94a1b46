// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

/// Binary operators of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    EqEq,
    NEq,
    LThan,
    GThan,
    LTEq,
    GTEq,
    LogAnd,
    LogOr,
}

impl AstOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Subtract | Self::Multiply | Self::Divide)
    }

    /// `+` and `-`, the only operators that accept a pointer operand.
    pub fn is_additive(self) -> bool {
        matches!(self, Self::Add | Self::Subtract)
    }

    pub fn is_relational(self) -> bool {
        matches!(self, Self::EqEq | Self::NEq | Self::LThan | Self::GThan | Self::LTEq | Self::GTEq)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::LogAnd | Self::LogOr)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::EqEq => "==",
            Self::NEq => "!=",
            Self::LThan => "<",
            Self::GThan => ">",
            Self::LTEq => "<=",
            Self::GTEq => ">=",
            Self::LogAnd => "&&",
            Self::LogOr => "||",
        }
    }
}

impl fmt::Display for AstOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
