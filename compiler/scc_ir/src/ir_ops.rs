// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_ast::AstOp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrRelOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl TryFrom<AstOp> for IrArithOp {
    type Error = AstOp;

    fn try_from(op: AstOp) -> Result<Self, Self::Error> {
        match op {
            AstOp::Add => Ok(Self::Add),
            AstOp::Subtract => Ok(Self::Sub),
            AstOp::Multiply => Ok(Self::Mul),
            AstOp::Divide => Ok(Self::Div),
            other => Err(other),
        }
    }
}

impl TryFrom<AstOp> for IrRelOp {
    type Error = AstOp;

    fn try_from(op: AstOp) -> Result<Self, Self::Error> {
        match op {
            AstOp::EqEq => Ok(Self::Eq),
            AstOp::NEq => Ok(Self::Ne),
            AstOp::GThan => Ok(Self::Gt),
            AstOp::LThan => Ok(Self::Lt),
            AstOp::GTEq => Ok(Self::Ge),
            AstOp::LTEq => Ok(Self::Le),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(AstOp::Add, Ok(IrArithOp::Add))]
    #[case(AstOp::Divide, Ok(IrArithOp::Div))]
    #[case(AstOp::LThan, Err(AstOp::LThan))]
    #[case(AstOp::LogAnd, Err(AstOp::LogAnd))]
    fn test_arith_op_from_ast(#[case] op: AstOp, #[case] expected: Result<IrArithOp, AstOp>) {
        assert_eq!(IrArithOp::try_from(op), expected);
    }

    #[rstest]
    #[case(AstOp::EqEq, Ok(IrRelOp::Eq))]
    #[case(AstOp::GTEq, Ok(IrRelOp::Ge))]
    #[case(AstOp::Subtract, Err(AstOp::Subtract))]
    #[case(AstOp::LogOr, Err(AstOp::LogOr))]
    fn test_rel_op_from_ast(#[case] op: AstOp, #[case] expected: Result<IrRelOp, AstOp>) {
        assert_eq!(IrRelOp::try_from(op), expected);
    }
}
