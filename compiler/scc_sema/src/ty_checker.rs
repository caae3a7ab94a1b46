// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};
use scc_ast::*;
use scc_ctx::CompilerCtx;
use scc_errors::{Diagnostic, ErrCode};
use scc_span::Span;
use scc_symbol::{Symbol, SymbolId, SymbolKind};
use scc_types::{Ty, ValueTy};

pub type TypeCheckResult<T = ()> = Result<T, Diagnostic>;

pub struct TypeChecker {
    ctx: Rc<RefCell<CompilerCtx>>,

    /// Decayed return type of the function being checked.
    curr_ret: Option<ValueTy>,
}

impl TypeChecker {
    pub fn new(ctx: Rc<RefCell<CompilerCtx>>) -> Self {
        Self { ctx, curr_ret: None }
    }

    /// Start the type checking process
    ///
    /// Checks every function body of an already resolved tree. The tree is
    /// never modified; the first violation is returned.
    pub fn check(&mut self, nodes: &[AstNode]) -> TypeCheckResult {
        for node in nodes {
            if let AstNode::FuncDef(def) = node {
                self.check_func_def(def)?;
            }
        }
        Ok(())
    }

    fn check_func_def(&mut self, def: &FuncDef) -> TypeCheckResult {
        let span = def.decl.meta.span;
        let func = self.symbol(def.decl.sym, span)?;
        let ret = func
            .ty
            .return_type()
            .and_then(Ty::decay)
            .ok_or_else(|| Diagnostic::internal(Some(span), format!("'{}' has no return type", func.name)))?;

        debug!("checking function '{}' returning '{ret}'", func.name);
        self.curr_ret = Some(ret);
        let res = self.check_compound(&def.body);
        self.curr_ret = None;
        res
    }

    fn check_compound(&mut self, block: &CompoundStmt) -> TypeCheckResult {
        for stmt in &block.stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> TypeCheckResult {
        match &stmt.kind {
            StmtKind::Empty => Ok(()),
            StmtKind::Expr(expr) => self.check_expr(expr).map(|_| ()),
            StmtKind::If { cond, then_branch, else_branch } => {
                self.check_condition(cond)?;
                self.check_stmt(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch)?;
                }
                Ok(())
            }
            StmtKind::While { cond, body } => {
                self.check_condition(cond)?;
                self.check_stmt(body)
            }
            StmtKind::Return(value) => self.check_return(value.as_ref(), stmt.meta.span),
            StmtKind::Compound(block) => self.check_compound(block),
        }
    }

    fn check_condition(&self, cond: &Expr) -> TypeCheckResult {
        let ty = self.check_expr(cond)?;
        if ty != ValueTy::Int {
            return Err(Diagnostic::type_error(
                ErrCode::TYP4004,
                cond.meta.span,
                format!("condition must be 'int', found '{ty}'"),
            ));
        }
        Ok(())
    }

    fn check_return(&self, value: Option<&Expr>, span: Span) -> TypeCheckResult {
        let Some(expected) = self.curr_ret else {
            return Err(Diagnostic::internal(Some(span), "return outside of a function"));
        };
        match (expected, value) {
            (ValueTy::Void, None) => Ok(()),
            (ValueTy::Void, Some(value)) => Err(Diagnostic::type_error(
                ErrCode::TYP4005,
                value.meta.span,
                "a 'void' function cannot return a value",
            )),
            (_, None) => Err(Diagnostic::type_error(
                ErrCode::TYP4005,
                span,
                format!("function must return a value of type '{expected}'"),
            )),
            (_, Some(value)) => {
                let found = self.check_expr(value)?;
                if found != expected {
                    return Err(Diagnostic::type_error(
                        ErrCode::TYP4005,
                        value.meta.span,
                        format!("expected return type '{expected}', found '{found}'"),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Computes the decayed type of `expr`.
    ///
    /// Pure: later stages call this to learn operand categories (for
    /// example to decide whether an addition needs pointer scaling).
    pub fn check_expr(&self, expr: &Expr) -> TypeCheckResult<ValueTy> {
        let span = expr.meta.span;
        let ty = match &expr.kind {
            ExprKind::Num(_) => ValueTy::Int,
            ExprKind::Ident(ident) => {
                let sym = self.symbol(ident.sym, span)?;
                Self::value_ty(&sym, span)?
            }
            ExprKind::Assign { target, value } => self.check_assign(target, value)?,
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(*op, lhs, rhs, span)?,
            ExprKind::AddrOf(operand) => self.check_addr_of(operand)?,
            ExprKind::Deref(operand) => {
                let ty = self.check_expr(operand)?;
                ty.deref().ok_or_else(|| {
                    Diagnostic::type_error(ErrCode::TYP4006, span, format!("cannot dereference a value of type '{ty}'"))
                })?
            }
            ExprKind::Call { callee, args } => self.check_call(callee, args, span)?,
            ExprKind::Comma(exprs) => {
                let mut last = None;
                for e in exprs {
                    last = Some(self.check_expr(e)?);
                }
                last.ok_or_else(|| Diagnostic::internal(Some(span), "empty comma expression"))?
            }
        };
        trace!("{}: '{ty}'", span.start);
        Ok(ty)
    }

    fn check_assign(&self, target: &Expr, value: &Expr) -> TypeCheckResult<ValueTy> {
        let span = target.meta.span;
        let assignable = match &target.kind {
            ExprKind::Deref(_) => true,
            ExprKind::Ident(ident) => {
                let sym = self.symbol(ident.sym, span)?;
                sym.kind.is_object() && !sym.is_array()
            }
            _ => false,
        };
        if !assignable {
            return Err(Diagnostic::object_error(ErrCode::OBJ3000, span, "invalid assignment target"));
        }

        let target_ty = self.check_expr(target)?;
        let value_ty = self.check_expr(value)?;
        if target_ty != value_ty {
            return Err(Diagnostic::type_error(
                ErrCode::TYP4001,
                value.meta.span,
                format!("cannot assign a value of type '{value_ty}' to '{target_ty}'"),
            ));
        }
        Ok(value_ty)
    }

    fn check_binary(&self, op: AstOp, lhs: &Expr, rhs: &Expr, span: Span) -> TypeCheckResult<ValueTy> {
        let lhs_ty = self.check_expr(lhs)?;
        let rhs_ty = self.check_expr(rhs)?;
        let incompatible = || {
            Diagnostic::type_error(
                ErrCode::TYP4000,
                span,
                format!("'{lhs_ty}' {op} '{rhs_ty}' is not allowed"),
            )
        };
        if lhs_ty.is_void() || rhs_ty.is_void() {
            return Err(incompatible());
        }

        if op.is_logical() {
            return match (lhs_ty, rhs_ty) {
                (ValueTy::Int, ValueTy::Int) => Ok(ValueTy::Int),
                _ => Err(incompatible()),
            };
        }
        if op.is_relational() {
            return if lhs_ty == rhs_ty { Ok(ValueTy::Int) } else { Err(incompatible()) };
        }
        match (lhs_ty, rhs_ty) {
            (ValueTy::Int, ValueTy::Int) => Ok(ValueTy::Int),
            (p, ValueTy::Int) | (ValueTy::Int, p) if op.is_additive() && p.is_pointer() => Ok(p),
            _ => Err(incompatible()),
        }
    }

    fn check_addr_of(&self, operand: &Expr) -> TypeCheckResult<ValueTy> {
        let span = operand.meta.span;
        let sym = match &operand.kind {
            ExprKind::Ident(ident) => self.symbol(ident.sym, span)?,
            _ => {
                return Err(Diagnostic::object_error(
                    ErrCode::OBJ3001,
                    span,
                    "operand of '&' must be a variable",
                ))
            }
        };
        if !matches!(sym.kind, SymbolKind::Variable | SymbolKind::Parameter) {
            return Err(Diagnostic::object_error(
                ErrCode::OBJ3001,
                span,
                format!("cannot take the address of '{}'", sym.name),
            ));
        }
        if sym.ty != Ty::Int {
            return Err(Diagnostic::type_error(
                ErrCode::TYP4007,
                span,
                format!("cannot take the address of '{}' of type '{}'", sym.name, sym.ty),
            ));
        }
        Ok(ValueTy::IntPtr)
    }

    fn check_call(&self, callee: &IdentRef, args: &[Expr], span: Span) -> TypeCheckResult<ValueTy> {
        let func = self.symbol(callee.sym, span)?;
        let (Some(params), Some(ret)) = (func.ty.param_types(), func.ty.return_type()) else {
            return Err(Diagnostic::internal(Some(span), format!("'{}' has no function type", func.name)));
        };

        if params.len() != args.len() {
            return Err(Diagnostic::type_error(
                ErrCode::TYP4002,
                span,
                format!("'{}' expects {} argument(s), found {}", func.name, params.len(), args.len()),
            ));
        }
        for (idx, (param, arg)) in params.iter().zip(args).enumerate() {
            let expected = Self::value_ty_of(param, arg.meta.span)?;
            let found = self.check_expr(arg)?;
            if found != expected {
                return Err(Diagnostic::type_error(
                    ErrCode::TYP4003,
                    arg.meta.span,
                    format!(
                        "argument {} of '{}' must be '{expected}', found '{found}'",
                        idx + 1,
                        func.name
                    ),
                ));
            }
        }
        Self::value_ty_of(ret, span)
    }

    fn value_ty(sym: &Symbol, span: Span) -> TypeCheckResult<ValueTy> {
        Self::value_ty_of(&sym.ty, span)
    }

    fn value_ty_of(ty: &Ty, span: Span) -> TypeCheckResult<ValueTy> {
        ty.decay()
            .ok_or_else(|| Diagnostic::type_error(ErrCode::TYP4008, span, format!("'{ty}' cannot be used as a value")))
    }

    fn symbol(&self, id: Option<SymbolId>, span: Span) -> TypeCheckResult<Symbol> {
        id.and_then(|id| self.ctx.borrow().symbol(id).cloned())
            .ok_or_else(|| Diagnostic::internal(Some(span), "identifier was not resolved"))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use scc_ast::build::*;
    use scc_ctx::builder::CompilerCtxBuilder;
    use scc_errors::ErrorKind;

    use super::*;
    use crate::resolver::Resolver;

    fn analyze(mut nodes: Vec<AstNode>) -> TypeCheckResult {
        let _ = env_logger::builder().is_test(true).try_init();
        let ctx = CompilerCtxBuilder::new().build_shared();
        Resolver::new(ctx.clone()).resolve(&mut nodes)?;
        TypeChecker::new(ctx).check(&nodes)
    }

    /// Resolves `nodes` and returns the type of the first statement of the
    /// first function, which must be an expression statement.
    fn first_expr_ty(mut nodes: Vec<AstNode>) -> TypeCheckResult<ValueTy> {
        let ctx = CompilerCtxBuilder::new().build_shared();
        Resolver::new(ctx.clone()).resolve(&mut nodes)?;
        let def = nodes.iter().find_map(AstNode::as_func_def).expect("function");
        let StmtKind::Expr(expr) = &def.body.stmts[0].kind else {
            panic!("expected expression statement");
        };
        TypeChecker::new(ctx).check_expr(expr)
    }

    fn main_with(decls: Vec<VarDeclStmt>, stmts: Vec<Stmt>) -> AstNode {
        func_def(BaseTy::Int, "main", vec![], block(decls, stmts))
    }

    fn locals() -> Vec<VarDeclStmt> {
        vec![var_decl(vec![scalar("i"), pointer("p"), array("a", 4), pointer_array("pp", 2)])]
    }

    #[test]
    fn test_pointer_example_type_checks() {
        // int main(){ int *p; int y; y = 5; p = &y; print(*p); return 0; }
        let nodes = vec![main_with(
            vec![var_decl(vec![pointer("p")]), var_decl(vec![scalar("y")])],
            vec![
                expr_stmt(assign(ident("y"), num(5))),
                expr_stmt(assign(ident("p"), addr(ident("y")))),
                expr_stmt(call("print", vec![deref(ident("p"))])),
                ret(Some(num(0))),
            ],
        )];
        assert!(analyze(nodes).is_ok());
    }

    #[rstest]
    #[case(ident("i"), ValueTy::Int)]
    #[case(ident("p"), ValueTy::IntPtr)]
    #[case(ident("a"), ValueTy::IntPtr)]
    #[case(ident("pp"), ValueTy::IntPtrPtr)]
    #[case(add(ident("p"), ident("i")), ValueTy::IntPtr)]
    #[case(add(num(1), ident("a")), ValueTy::IntPtr)]
    #[case(sub(ident("pp"), num(1)), ValueTy::IntPtrPtr)]
    #[case(deref(ident("pp")), ValueTy::IntPtr)]
    #[case(deref(add(ident("a"), num(2))), ValueTy::Int)]
    #[case(addr(ident("i")), ValueTy::IntPtr)]
    #[case(eq(ident("p"), ident("a")), ValueTy::Int)]
    #[case(and(ident("i"), lt(ident("i"), num(3))), ValueTy::Int)]
    #[case(comma(vec![ident("i"), ident("p")]), ValueTy::IntPtr)]
    #[case(assign(deref(ident("p")), num(7)), ValueTy::Int)]
    fn test_expression_types(#[case] expr: Expr, #[case] expected: ValueTy) {
        let nodes = vec![main_with(locals(), vec![expr_stmt(expr)])];
        assert_eq!(first_expr_ty(nodes), Ok(expected));
    }

    #[rstest]
    #[case(mul(ident("p"), num(2)), ErrCode::TYP4000)]
    #[case(add(ident("p"), ident("a")), ErrCode::TYP4000)]
    #[case(lt(ident("p"), ident("i")), ErrCode::TYP4000)]
    #[case(or(ident("p"), num(1)), ErrCode::TYP4000)]
    #[case(deref(ident("i")), ErrCode::TYP4006)]
    #[case(addr(ident("p")), ErrCode::TYP4007)]
    #[case(addr(ident("a")), ErrCode::TYP4007)]
    #[case(assign(ident("p"), num(1)), ErrCode::TYP4001)]
    #[case(add(call("print", vec![num(1)]), num(1)), ErrCode::TYP4000)]
    fn test_type_errors(#[case] expr: Expr, #[case] code: ErrCode) {
        let nodes = vec![main_with(locals(), vec![expr_stmt(expr)])];
        let err = first_expr_ty(nodes).expect_err("ill-typed expression");
        assert_eq!((err.kind, err.code), (ErrorKind::TypeError, code));
    }

    #[rstest]
    #[case(assign(ident("a"), num(1)), ErrCode::OBJ3000)]
    #[case(assign(num(1), num(1)), ErrCode::OBJ3000)]
    #[case(assign(add(ident("i"), num(1)), num(1)), ErrCode::OBJ3000)]
    #[case(addr(num(3)), ErrCode::OBJ3001)]
    #[case(addr(deref(ident("p"))), ErrCode::OBJ3001)]
    fn test_object_errors(#[case] expr: Expr, #[case] code: ErrCode) {
        let nodes = vec![main_with(locals(), vec![expr_stmt(expr)])];
        let err = first_expr_ty(nodes).expect_err("invalid object");
        assert_eq!((err.kind, err.code), (ErrorKind::ObjectError, code));
    }

    fn sum_fn() -> AstNode {
        func_def(
            BaseTy::Int,
            "sum",
            vec![param("n"), pointer_param("xs")],
            block(vec![], vec![ret(Some(ident("n")))]),
        )
    }

    #[test]
    fn test_wrong_argument_count_is_type_error() {
        let nodes = vec![sum_fn(), main_with(vec![], vec![expr_stmt(call("sum", vec![num(1)]).at(4, 2))])];
        let err = analyze(nodes).expect_err("arity mismatch");
        assert_eq!((err.kind, err.code), (ErrorKind::TypeError, ErrCode::TYP4002));
        assert_eq!(err.span, Some(Span::at(4, 2)));
    }

    #[test]
    fn test_wrong_argument_type_is_type_error() {
        let nodes = vec![
            sum_fn(),
            main_with(vec![var_decl(vec![scalar("k")])], vec![expr_stmt(call("sum", vec![num(1), ident("k")]))]),
        ];
        let err = analyze(nodes).expect_err("argument mismatch");
        assert_eq!((err.kind, err.code), (ErrorKind::TypeError, ErrCode::TYP4003));
    }

    #[test]
    fn test_array_argument_decays_to_pointer_parameter() {
        let nodes = vec![
            sum_fn(),
            main_with(
                vec![var_decl(vec![array("buf", 8)])],
                vec![ret(Some(call("sum", vec![num(8), ident("buf")])))],
            ),
        ];
        assert!(analyze(nodes).is_ok());
    }

    #[test]
    fn test_pointer_returning_function() {
        let nodes = vec![
            global(vec![array("cells", 4)]),
            pointer_func_def("cell", vec![param("i")], block(vec![], vec![ret(Some(add(ident("cells"), ident("i"))))])),
            main_with(vec![], vec![expr_stmt(assign(deref(call("cell", vec![num(2)])), num(9))), ret(Some(num(0)))]),
        ];
        assert!(analyze(nodes).is_ok());
    }

    #[rstest]
    #[case(BaseTy::Void, Some(num(1)))]
    #[case(BaseTy::Int, None)]
    fn test_return_mismatch_is_type_error(#[case] ret_ty: BaseTy, #[case] value: Option<Expr>) {
        let nodes = vec![func_def(ret_ty, "f", vec![], block(vec![], vec![ret(value)]))];
        let err = analyze(nodes).expect_err("bad return");
        assert_eq!(err.code, ErrCode::TYP4005);
    }

    #[test]
    fn test_returning_pointer_from_int_function_is_type_error() {
        let nodes = vec![func_def(
            BaseTy::Int,
            "f",
            vec![pointer_param("p")],
            block(vec![], vec![ret(Some(ident("p")))]),
        )];
        assert_eq!(analyze(nodes).map_err(|e| e.code), Err(ErrCode::TYP4005));
    }

    #[test]
    fn test_void_function_may_return_without_value() {
        let nodes = vec![func_def(BaseTy::Void, "f", vec![], block(vec![], vec![ret(None)]))];
        assert!(analyze(nodes).is_ok());
    }

    #[test]
    fn test_pointer_condition_is_type_error() {
        let nodes = vec![main_with(
            vec![var_decl(vec![pointer("p")])],
            vec![while_stmt(ident("p"), empty())],
        )];
        assert_eq!(analyze(nodes).map_err(|e| e.code), Err(ErrCode::TYP4004));
    }

    #[test]
    fn test_nested_blocks_are_checked() {
        let nodes = vec![main_with(
            vec![var_decl(vec![scalar("i")])],
            vec![if_stmt(
                ident("i"),
                compound(vec![var_decl(vec![pointer("q")])], vec![expr_stmt(assign(ident("q"), num(0)))]),
                None,
            )],
        )];
        assert_eq!(analyze(nodes).map_err(|e| e.code), Err(ErrCode::TYP4001));
    }
}
