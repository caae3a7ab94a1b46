// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_symbol::SymbolId;

use crate::{IrArithOp, IrRelOp};

/// Right-hand side of an [`IrStmt::Assign`]. Reads at most two symbols.
#[derive(Debug, Clone, PartialEq)]
pub enum IrExpr {
    Var(SymbolId),
    IntLit(i32),
    Arith(IrArithOp, SymbolId, SymbolId),
    Rel(IrRelOp, SymbolId, SymbolId),
    AddrOf(SymbolId),
}

/// A compound block together with the declarations it owns, temporaries
/// included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IrBlock {
    pub decls: Vec<SymbolId>,
    pub stmts: Vec<IrStmt>,
}

impl IrBlock {
    pub fn new(decls: Vec<SymbolId>, stmts: Vec<IrStmt>) -> Self {
        Self { decls, stmts }
    }

    /// Blocks nested anywhere below this one, in source order.
    pub fn nested_blocks(&self) -> Vec<&IrBlock> {
        let mut out = vec![];
        for stmt in &self.stmts {
            stmt.collect_blocks(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IrStmt {
    Empty,

    Block(IrBlock),

    If {
        cond: SymbolId,
        then_block: IrBlock,
        else_block: Option<IrBlock>,
    },

    While {
        /// Re-evaluated before every iteration.
        cond_code: Vec<IrStmt>,
        cond: SymbolId,
        body: IrBlock,
    },

    Return(Option<SymbolId>),

    Call {
        dest: SymbolId,
        callee: SymbolId,
        args: Vec<SymbolId>,
    },

    Print(SymbolId),

    Assign {
        dest: SymbolId,
        expr: IrExpr,
    },

    /// `*addr = src`
    Store {
        addr: SymbolId,
        src: SymbolId,
    },

    /// `dest = *addr`
    Load {
        dest: SymbolId,
        addr: SymbolId,
    },
}

impl IrStmt {
    fn collect_blocks<'a>(&'a self, out: &mut Vec<&'a IrBlock>) {
        let push = |block: &'a IrBlock, out: &mut Vec<&'a IrBlock>| {
            out.push(block);
            for stmt in &block.stmts {
                stmt.collect_blocks(out);
            }
        };
        match self {
            IrStmt::Block(block) => push(block, out),
            IrStmt::If { then_block, else_block, .. } => {
                push(then_block, out);
                if let Some(else_block) = else_block {
                    push(else_block, out);
                }
            }
            IrStmt::While { cond_code, body, .. } => {
                for stmt in cond_code {
                    stmt.collect_blocks(out);
                }
                push(body, out);
            }
            _ => {}
        }
    }
}

/// Frame dimensions computed by frame layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInfo {
    /// Bytes taken by locals and temporaries.
    pub local_size: usize,

    /// Whole activation record: locals, saved `$fp`/`$ra` and incoming
    /// parameters.
    pub frame_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IrFunction {
    pub sym: SymbolId,
    pub params: Vec<SymbolId>,
    pub body: IrBlock,

    /// `None` until frame layout has run.
    pub frame: Option<FrameInfo>,
}

impl IrFunction {
    pub fn new(sym: SymbolId, params: Vec<SymbolId>, body: IrBlock) -> Self {
        Self { sym, params, body, frame: None }
    }
}

/// A lowered top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum IrItem {
    VarDecl(SymbolId),
    Func(IrFunction),
}

impl IrItem {
    pub fn as_func(&self) -> Option<&IrFunction> {
        match self {
            IrItem::Func(func) => Some(func),
            _ => None,
        }
    }
}
