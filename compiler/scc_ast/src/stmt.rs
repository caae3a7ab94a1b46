// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_span::{HasSpan, Span};

use crate::{Expr, NodeMeta, VarDeclStmt};

/// `{ decls... stmts... }`
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStmt {
    pub decls: Vec<VarDeclStmt>,
    pub stmts: Vec<Stmt>,
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `;`
    Empty,

    /// Expression statement; a comma list arrives as [`ExprKind::Comma`](crate::ExprKind::Comma).
    Expr(Expr),

    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    While {
        cond: Expr,
        body: Box<Stmt>,
    },

    Return(Option<Expr>),

    Compound(CompoundStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub meta: NodeMeta,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self { kind, meta: NodeMeta::default() }
    }

    pub fn as_compound(&self) -> Option<&CompoundStmt> {
        match &self.kind {
            StmtKind::Compound(block) => Some(block),
            _ => None,
        }
    }
}

impl HasSpan for Stmt {
    fn span(&self) -> &Span {
        &self.meta.span
    }
}
