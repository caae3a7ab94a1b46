// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use scc_span::{HasSpan, Span};
use scc_symbol::SymbolId;

use crate::CompoundStmt;

/// Position information attached to every node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeMeta {
    pub span: Span,
}

impl NodeMeta {
    pub fn new(span: Span) -> Self {
        Self { span }
    }
}

/// Type keyword written in front of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseTy {
    Int,
    Void,
}

/// One declarator of a variable declaration: `x`, `*p`, `a[10]` or `*a[10]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,

    /// Leading `*`.
    pub pointer: bool,

    /// Trailing `[len]`.
    pub array_len: Option<usize>,

    /// Filled in by the resolver.
    pub sym: Option<SymbolId>,

    pub meta: NodeMeta,
}

/// `int x, *p, a[10];`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub base: BaseTy,
    pub declarators: Vec<Declarator>,
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub base: BaseTy,
    pub name: String,
    pub pointer: bool,

    /// Filled in by the resolver.
    pub sym: Option<SymbolId>,

    pub meta: NodeMeta,
}

/// Function declarator shared by prototypes and definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub ret: BaseTy,

    /// Leading `*` in front of the function name.
    pub pointer_ret: bool,

    pub name: String,
    pub params: Vec<ParamDecl>,

    /// Filled in by the resolver.
    pub sym: Option<SymbolId>,

    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub decl: FuncDecl,
    pub body: CompoundStmt,
    pub meta: NodeMeta,
}

/// A top-level node handed over by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Decl(VarDeclStmt),
    FuncProto(FuncDecl),
    FuncDef(FuncDef),
}

impl AstNode {
    pub fn meta(&self) -> &NodeMeta {
        match self {
            AstNode::Decl(decl) => &decl.meta,
            AstNode::FuncProto(proto) => &proto.meta,
            AstNode::FuncDef(def) => &def.meta,
        }
    }

    pub fn as_func_def(&self) -> Option<&FuncDef> {
        match self {
            AstNode::FuncDef(def) => Some(def),
            _ => None,
        }
    }
}

impl HasSpan for AstNode {
    fn span(&self) -> &Span {
        &self.meta().span
    }
}
