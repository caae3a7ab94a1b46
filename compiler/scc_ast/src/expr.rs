// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_span::{HasSpan, Span};
use scc_symbol::SymbolId;

use crate::{AstOp, NodeMeta};

/// An identifier use. `sym` is the slot the resolver rewrites.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentRef {
    pub name: String,
    pub sym: Option<SymbolId>,
}

impl IdentRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), sym: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Num(i32),

    Ident(IdentRef),

    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },

    Binary {
        op: AstOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// `&e`
    AddrOf(Box<Expr>),

    /// `*e`
    Deref(Box<Expr>),

    Call {
        callee: IdentRef,
        args: Vec<Expr>,
    },

    /// `e1, e2, ...`
    Comma(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub meta: NodeMeta,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, meta: NodeMeta::default() }
    }

    pub fn as_ident(&self) -> Option<&IdentRef> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

impl HasSpan for Expr {
    fn span(&self) -> &Span {
        &self.meta.span
    }
}
