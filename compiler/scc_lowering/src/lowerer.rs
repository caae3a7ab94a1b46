// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use scc_ast::*;
use scc_ctx::CompilerCtx;
use scc_errors::Diagnostic;
use scc_ir::*;
use scc_sema::ty_checker::TypeChecker;
use scc_span::Span;
use scc_symbol::{is_builtin_print, Symbol, SymbolId, SymbolKind};
use scc_types::{Ty, ValueTy, WORD_SIZE};

use crate::fn_ctx::FnCtx;

pub type LoweringResult<T = Vec<IrStmt>> = Result<T, Diagnostic>;

/// Turns a resolved and type-checked tree into [`IrItem`]s.
///
/// Every intermediate value gets its own temporary; temporaries belong to
/// the innermost compound block being lowered.
pub struct AstToIrLowerer {
    ctx: Rc<RefCell<CompilerCtx>>,

    /// Answers operand categories for pointer scaling.
    checker: TypeChecker,
}

impl AstToIrLowerer {
    pub fn new(ctx: Rc<RefCell<CompilerCtx>>) -> Self {
        Self {
            checker: TypeChecker::new(ctx.clone()),
            ctx,
        }
    }

    pub fn lower(&mut self, nodes: &[AstNode]) -> LoweringResult<Vec<IrItem>> {
        let mut items = vec![];
        for node in nodes {
            match node {
                AstNode::Decl(decl) => {
                    for declarator in &decl.declarators {
                        items.push(IrItem::VarDecl(resolved(declarator.sym, declarator.meta.span)?));
                    }
                }
                AstNode::FuncProto(_) => {}
                AstNode::FuncDef(def) => items.push(IrItem::Func(self.lower_func(def)?)),
            }
        }
        Ok(items)
    }

    fn lower_func(&mut self, def: &FuncDef) -> LoweringResult<IrFunction> {
        let sym = resolved(def.decl.sym, def.decl.meta.span)?;
        let params = def
            .decl
            .params
            .iter()
            .map(|param| resolved(param.sym, param.meta.span))
            .collect::<Result<Vec<_>, _>>()?;

        let mut fn_ctx = FnCtx::new();
        let body = self.lower_compound(&def.body, &mut fn_ctx)?;
        debug!("lowered '{}' with {} temporaries", def.decl.name, fn_ctx.temp_count());
        Ok(IrFunction::new(sym, params, body))
    }

    fn lower_compound(&mut self, block: &CompoundStmt, fn_ctx: &mut FnCtx) -> LoweringResult<IrBlock> {
        fn_ctx.enter_block();
        let mut decls = vec![];
        for decl in &block.decls {
            for declarator in &decl.declarators {
                decls.push(resolved(declarator.sym, declarator.meta.span)?);
            }
        }

        let mut stmts = vec![];
        for stmt in &block.stmts {
            stmts.extend(self.lower_stmt(stmt, fn_ctx)?);
        }

        let temps = fn_ctx
            .exit_block()
            .ok_or_else(|| Diagnostic::internal(Some(block.meta.span), "temporary buffer already closed"))?;
        decls.extend(temps);
        Ok(IrBlock::new(decls, stmts))
    }

    /// Lowers the body of an `if` or `while`. A bare statement gets a block
    /// of its own without declarations.
    fn lower_branch(&mut self, stmt: &Stmt, fn_ctx: &mut FnCtx) -> LoweringResult<IrBlock> {
        match &stmt.kind {
            StmtKind::Compound(block) => self.lower_compound(block, fn_ctx),
            _ => Ok(IrBlock::new(vec![], self.lower_stmt(stmt, fn_ctx)?)),
        }
    }

    fn lower_stmt(&mut self, stmt: &Stmt, fn_ctx: &mut FnCtx) -> LoweringResult {
        match &stmt.kind {
            StmtKind::Empty => Ok(vec![IrStmt::Empty]),
            StmtKind::Expr(expr) => {
                let parts: Vec<&Expr> = match &expr.kind {
                    ExprKind::Comma(exprs) => exprs.iter().collect(),
                    _ => vec![expr],
                };
                let mut code = vec![];
                for part in parts {
                    let dest = self.new_temp(fn_ctx, part.meta.span)?;
                    code.extend(self.lower_expr(part, dest, fn_ctx)?);
                }
                Ok(code)
            }
            StmtKind::If { cond, then_branch, else_branch } => {
                let cond_var = self.new_temp(fn_ctx, cond.meta.span)?;
                let mut code = self.lower_expr(cond, cond_var, fn_ctx)?;
                let then_block = self.lower_branch(then_branch, fn_ctx)?;
                let else_block = match else_branch {
                    Some(else_branch) => Some(self.lower_branch(else_branch, fn_ctx)?),
                    None => None,
                };
                code.push(IrStmt::If { cond: cond_var, then_block, else_block });
                Ok(code)
            }
            StmtKind::While { cond, body } => {
                let cond_var = self.new_temp(fn_ctx, cond.meta.span)?;
                let cond_code = self.lower_expr(cond, cond_var, fn_ctx)?;
                let body = self.lower_branch(body, fn_ctx)?;
                Ok(vec![IrStmt::While { cond_code, cond: cond_var, body }])
            }
            StmtKind::Return(Some(value)) => {
                let result = self.new_temp(fn_ctx, value.meta.span)?;
                let mut code = self.lower_expr(value, result, fn_ctx)?;
                code.push(IrStmt::Return(Some(result)));
                Ok(code)
            }
            StmtKind::Return(None) => Ok(vec![IrStmt::Return(None)]),
            StmtKind::Compound(block) => Ok(vec![IrStmt::Block(self.lower_compound(block, fn_ctx)?)]),
        }
    }

    /// Emits code leaving the value of `expr` in `dest`.
    fn lower_expr(&mut self, expr: &Expr, dest: SymbolId, fn_ctx: &mut FnCtx) -> LoweringResult {
        let span = expr.meta.span;
        match &expr.kind {
            ExprKind::Num(value) => Ok(vec![assign(dest, IrExpr::IntLit(*value))]),
            ExprKind::Ident(ident) => Ok(vec![assign(dest, IrExpr::Var(resolved(ident.sym, span)?))]),
            ExprKind::Assign { target, value } => self.lower_assign(target, value, dest, fn_ctx),
            ExprKind::Binary { op, lhs, rhs } if op.is_logical() => {
                self.lower_short_circuit(*op, lhs, rhs, dest, fn_ctx)
            }
            ExprKind::Binary { op, lhs, rhs } => self.lower_binary(*op, lhs, rhs, dest, fn_ctx),
            ExprKind::AddrOf(operand) => {
                let ident = operand
                    .as_ident()
                    .ok_or_else(|| Diagnostic::internal(Some(span), "'&' applied to a non-variable"))?;
                Ok(vec![assign(dest, IrExpr::AddrOf(resolved(ident.sym, span)?))])
            }
            ExprKind::Deref(operand) => {
                let addr = self.new_temp(fn_ctx, span)?;
                let mut code = self.lower_expr(operand, addr, fn_ctx)?;
                code.push(IrStmt::Load { dest, addr });
                Ok(code)
            }
            ExprKind::Call { callee, args } => self.lower_call(callee, args, dest, span, fn_ctx),
            ExprKind::Comma(exprs) => {
                let mut code = vec![];
                let mut last = None;
                for e in exprs {
                    let part = self.new_temp(fn_ctx, e.meta.span)?;
                    code.extend(self.lower_expr(e, part, fn_ctx)?);
                    last = Some(part);
                }
                let last = last.ok_or_else(|| Diagnostic::internal(Some(span), "empty comma expression"))?;
                code.push(assign(dest, IrExpr::Var(last)));
                Ok(code)
            }
        }
    }

    fn lower_assign(&mut self, target: &Expr, value: &Expr, dest: SymbolId, fn_ctx: &mut FnCtx) -> LoweringResult {
        let span = target.meta.span;
        match &target.kind {
            ExprKind::Ident(ident) => {
                let var = resolved(ident.sym, span)?;
                let mut code = self.lower_expr(value, var, fn_ctx)?;
                code.push(assign(dest, IrExpr::Var(var)));
                Ok(code)
            }
            ExprKind::Deref(pointer) => {
                let addr = self.new_temp(fn_ctx, span)?;
                let mut code = self.lower_expr(pointer, addr, fn_ctx)?;
                let src = self.new_temp(fn_ctx, value.meta.span)?;
                code.extend(self.lower_expr(value, src, fn_ctx)?);
                code.push(IrStmt::Store { addr, src });
                code.push(assign(dest, IrExpr::Var(src)));
                Ok(code)
            }
            _ => Err(Diagnostic::internal(Some(span), "assignment to a non-object survived type checking")),
        }
    }

    fn lower_binary(
        &mut self,
        op: AstOp,
        lhs: &Expr,
        rhs: &Expr,
        dest: SymbolId,
        fn_ctx: &mut FnCtx,
    ) -> LoweringResult {
        let span = lhs.meta.span;
        let lhs_var = self.new_temp(fn_ctx, span)?;
        let mut code = self.lower_expr(lhs, lhs_var, fn_ctx)?;
        let rhs_var = self.new_temp(fn_ctx, rhs.meta.span)?;
        code.extend(self.lower_expr(rhs, rhs_var, fn_ctx)?);

        if let Ok(rel) = IrRelOp::try_from(op) {
            code.push(assign(dest, IrExpr::Rel(rel, lhs_var, rhs_var)));
            return Ok(code);
        }
        let arith = IrArithOp::try_from(op)
            .map_err(|op| Diagnostic::internal(Some(span), format!("'{op}' is not an arithmetic operator")))?;

        let lhs_ty = self.checker.check_expr(lhs)?;
        let rhs_ty = self.checker.check_expr(rhs)?;
        let (lhs_var, rhs_var) = match (lhs_ty, rhs_ty) {
            (p, ValueTy::Int) if p.is_pointer() => {
                let scaled = self.scale_by_word(rhs_var, span, &mut code, fn_ctx)?;
                (lhs_var, scaled)
            }
            (ValueTy::Int, p) if p.is_pointer() => {
                let scaled = self.scale_by_word(lhs_var, span, &mut code, fn_ctx)?;
                (scaled, rhs_var)
            }
            _ => (lhs_var, rhs_var),
        };
        code.push(assign(dest, IrExpr::Arith(arith, lhs_var, rhs_var)));
        Ok(code)
    }

    /// Emits `index * WORD_SIZE` into a fresh temporary.
    fn scale_by_word(
        &mut self,
        index: SymbolId,
        span: Span,
        code: &mut Vec<IrStmt>,
        fn_ctx: &mut FnCtx,
    ) -> LoweringResult<SymbolId> {
        let word = self.new_temp(fn_ctx, span)?;
        code.push(assign(word, IrExpr::IntLit(WORD_SIZE as i32)));
        let scaled = self.new_temp(fn_ctx, span)?;
        code.push(assign(scaled, IrExpr::Arith(IrArithOp::Mul, index, word)));
        Ok(scaled)
    }

    fn lower_short_circuit(
        &mut self,
        op: AstOp,
        lhs: &Expr,
        rhs: &Expr,
        dest: SymbolId,
        fn_ctx: &mut FnCtx,
    ) -> LoweringResult {
        let lhs_var = self.new_temp(fn_ctx, lhs.meta.span)?;
        let mut code = self.lower_expr(lhs, lhs_var, fn_ctx)?;

        let rhs_var = self.new_temp(fn_ctx, rhs.meta.span)?;
        let mut rhs_code = self.lower_expr(rhs, rhs_var, fn_ctx)?;
        rhs_code.push(IrStmt::If {
            cond: rhs_var,
            then_block: constant_block(dest, 1),
            else_block: Some(constant_block(dest, 0)),
        });
        let rhs_block = IrBlock::new(vec![], rhs_code);

        // `&&` evaluates the right side only when the left side holds,
        // `||` only when it does not.
        let (then_block, else_block) = match op {
            AstOp::LogAnd => (rhs_block, constant_block(dest, 0)),
            _ => (constant_block(dest, 1), rhs_block),
        };
        code.push(IrStmt::If { cond: lhs_var, then_block, else_block: Some(else_block) });
        Ok(code)
    }

    fn lower_call(
        &mut self,
        callee: &IdentRef,
        args: &[Expr],
        dest: SymbolId,
        span: Span,
        fn_ctx: &mut FnCtx,
    ) -> LoweringResult {
        let callee_id = resolved(callee.sym, span)?;
        let is_print = self.ctx.borrow().symbol(callee_id).is_some_and(is_builtin_print);

        let mut code = vec![];
        let mut arg_vars = Vec::with_capacity(args.len());
        for arg in args {
            let var = self.new_temp(fn_ctx, arg.meta.span)?;
            code.extend(self.lower_expr(arg, var, fn_ctx)?);
            arg_vars.push(var);
        }

        if is_print {
            let [value] = arg_vars.as_slice() else {
                return Err(Diagnostic::internal(Some(span), "'print' takes exactly one argument"));
            };
            code.push(IrStmt::Print(*value));
        } else {
            code.push(IrStmt::Call { dest, callee: callee_id, args: arg_vars });
        }
        Ok(code)
    }

    fn new_temp(&mut self, fn_ctx: &mut FnCtx, span: Span) -> LoweringResult<SymbolId> {
        let name = fn_ctx.next_temp_name();
        let temp = Symbol::new(name, fn_ctx.level(), SymbolKind::Temporary, Ty::Int);
        let id = self.ctx.borrow_mut().symbols.declare(temp);
        if !fn_ctx.record_temp(id) {
            return Err(Diagnostic::internal(Some(span), "temporary created outside of a block"));
        }
        Ok(id)
    }
}

fn assign(dest: SymbolId, expr: IrExpr) -> IrStmt {
    IrStmt::Assign { dest, expr }
}

fn constant_block(dest: SymbolId, value: i32) -> IrBlock {
    IrBlock::new(vec![], vec![assign(dest, IrExpr::IntLit(value))])
}

fn resolved(slot: Option<SymbolId>, span: Span) -> LoweringResult<SymbolId> {
    slot.ok_or_else(|| Diagnostic::internal(Some(span), "identifier was not resolved"))
}
