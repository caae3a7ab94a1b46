// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Terse constructors for AST nodes.
//!
//! The parser and the test-suites assemble trees through these helpers;
//! nodes start at the default position and can be placed with
//! [`Positioned::at`].
//!
//! ```
//! use scc_ast::build::*;
//!
//! // int x; int main() { x = 3; print(x); return 0; }
//! let program = vec![
//!     global(vec![scalar("x")]),
//!     func_def(BaseTy::Int, "main", vec![], block(vec![], vec![
//!         expr_stmt(assign(ident("x"), num(3))),
//!         expr_stmt(call("print", vec![ident("x")])),
//!         ret(Some(num(0))),
//!     ])),
//! ];
//! assert_eq!(program.len(), 2);
//! ```

pub use crate::{AstOp, BaseTy};

use scc_span::Span;

use crate::*;

/// Attaches a source position to a freshly built node.
pub trait Positioned {
    fn at(self, line: usize, column: usize) -> Self;
}

impl Positioned for Expr {
    fn at(mut self, line: usize, column: usize) -> Self {
        self.meta.span = Span::at(line, column);
        self
    }
}

impl Positioned for Stmt {
    fn at(mut self, line: usize, column: usize) -> Self {
        self.meta.span = Span::at(line, column);
        self
    }
}

impl Positioned for Declarator {
    fn at(mut self, line: usize, column: usize) -> Self {
        self.meta.span = Span::at(line, column);
        self
    }
}

impl Positioned for ParamDecl {
    fn at(mut self, line: usize, column: usize) -> Self {
        self.meta.span = Span::at(line, column);
        self
    }
}

impl Positioned for AstNode {
    fn at(mut self, line: usize, column: usize) -> Self {
        let span = Span::at(line, column);
        match &mut self {
            AstNode::Decl(decl) => decl.meta.span = span,
            AstNode::FuncProto(proto) => proto.meta.span = span,
            AstNode::FuncDef(def) => {
                def.meta.span = span;
                def.decl.meta.span = span;
            }
        }
        self
    }
}

// declarators

fn declarator(name: &str, pointer: bool, array_len: Option<usize>) -> Declarator {
    Declarator {
        name: name.to_string(),
        pointer,
        array_len,
        sym: None,
        meta: NodeMeta::default(),
    }
}

/// `x`
pub fn scalar(name: &str) -> Declarator {
    declarator(name, false, None)
}

/// `*p`
pub fn pointer(name: &str) -> Declarator {
    declarator(name, true, None)
}

/// `a[len]`
pub fn array(name: &str, len: usize) -> Declarator {
    declarator(name, false, Some(len))
}

/// `*a[len]`
pub fn pointer_array(name: &str, len: usize) -> Declarator {
    declarator(name, true, Some(len))
}

pub fn typed_var_decl(base: BaseTy, declarators: Vec<Declarator>) -> VarDeclStmt {
    let meta = declarators.first().map(|d| d.meta).unwrap_or_default();
    VarDeclStmt { base, declarators, meta }
}

/// `int d1, d2, ...;`
pub fn var_decl(declarators: Vec<Declarator>) -> VarDeclStmt {
    typed_var_decl(BaseTy::Int, declarators)
}

/// A file-scope `int` declaration.
pub fn global(declarators: Vec<Declarator>) -> AstNode {
    AstNode::Decl(var_decl(declarators))
}

// functions

pub fn param(name: &str) -> ParamDecl {
    ParamDecl {
        base: BaseTy::Int,
        name: name.to_string(),
        pointer: false,
        sym: None,
        meta: NodeMeta::default(),
    }
}

pub fn pointer_param(name: &str) -> ParamDecl {
    ParamDecl { pointer: true, ..param(name) }
}

pub fn func_decl(ret: BaseTy, name: &str, params: Vec<ParamDecl>) -> FuncDecl {
    FuncDecl {
        ret,
        pointer_ret: false,
        name: name.to_string(),
        params,
        sym: None,
        meta: NodeMeta::default(),
    }
}

pub fn proto(ret: BaseTy, name: &str, params: Vec<ParamDecl>) -> AstNode {
    AstNode::FuncProto(func_decl(ret, name, params))
}

pub fn func_def(ret: BaseTy, name: &str, params: Vec<ParamDecl>, body: CompoundStmt) -> AstNode {
    AstNode::FuncDef(FuncDef {
        decl: func_decl(ret, name, params),
        body,
        meta: NodeMeta::default(),
    })
}

/// `int *name(params) body`
pub fn pointer_func_def(name: &str, params: Vec<ParamDecl>, body: CompoundStmt) -> AstNode {
    AstNode::FuncDef(FuncDef {
        decl: FuncDecl { pointer_ret: true, ..func_decl(BaseTy::Int, name, params) },
        body,
        meta: NodeMeta::default(),
    })
}

// statements

pub fn block(decls: Vec<VarDeclStmt>, stmts: Vec<Stmt>) -> CompoundStmt {
    CompoundStmt { decls, stmts, meta: NodeMeta::default() }
}

pub fn compound(decls: Vec<VarDeclStmt>, stmts: Vec<Stmt>) -> Stmt {
    Stmt::new(StmtKind::Compound(block(decls, stmts)))
}

pub fn empty() -> Stmt {
    Stmt::new(StmtKind::Empty)
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    let meta = expr.meta;
    Stmt { kind: StmtKind::Expr(expr), meta }
}

pub fn if_stmt(cond: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Stmt {
    Stmt::new(StmtKind::If {
        cond,
        then_branch: Box::new(then_branch),
        else_branch: else_branch.map(Box::new),
    })
}

pub fn while_stmt(cond: Expr, body: Stmt) -> Stmt {
    Stmt::new(StmtKind::While { cond, body: Box::new(body) })
}

pub fn ret(value: Option<Expr>) -> Stmt {
    Stmt::new(StmtKind::Return(value))
}

// expressions

pub fn num(value: i32) -> Expr {
    Expr::new(ExprKind::Num(value))
}

pub fn ident(name: &str) -> Expr {
    Expr::new(ExprKind::Ident(IdentRef::new(name)))
}

pub fn assign(target: Expr, value: Expr) -> Expr {
    Expr::new(ExprKind::Assign { target: Box::new(target), value: Box::new(value) })
}

pub fn bin(op: AstOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(ExprKind::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
}

pub fn add(lhs: Expr, rhs: Expr) -> Expr {
    bin(AstOp::Add, lhs, rhs)
}

pub fn sub(lhs: Expr, rhs: Expr) -> Expr {
    bin(AstOp::Subtract, lhs, rhs)
}

pub fn mul(lhs: Expr, rhs: Expr) -> Expr {
    bin(AstOp::Multiply, lhs, rhs)
}

pub fn lt(lhs: Expr, rhs: Expr) -> Expr {
    bin(AstOp::LThan, lhs, rhs)
}

pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
    bin(AstOp::EqEq, lhs, rhs)
}

pub fn and(lhs: Expr, rhs: Expr) -> Expr {
    bin(AstOp::LogAnd, lhs, rhs)
}

pub fn or(lhs: Expr, rhs: Expr) -> Expr {
    bin(AstOp::LogOr, lhs, rhs)
}

pub fn addr(operand: Expr) -> Expr {
    Expr::new(ExprKind::AddrOf(Box::new(operand)))
}

pub fn deref(operand: Expr) -> Expr {
    Expr::new(ExprKind::Deref(Box::new(operand)))
}

pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Call { callee: IdentRef::new(name), args })
}

pub fn comma(exprs: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Comma(exprs))
}
