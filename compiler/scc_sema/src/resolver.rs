// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace, warn};
use scc_ast::*;
use scc_ctx::CompilerCtx;
use scc_errors::{Diagnostic, ErrCode, ErrorKind};
use scc_scope::{Env, ScopeCtx, ScopeType};
use scc_span::Span;
use scc_symbol::*;
use scc_types::{Ty, WORD_SIZE};

pub type ResolverResult<T = ()> = Result<T, Diagnostic>;

/// Binds every declaration to a [`Symbol`] and rewrites every identifier
/// slot of the tree to the symbol it refers to.
pub struct Resolver {
    ctx: Rc<RefCell<CompilerCtx>>,
    scope: ScopeCtx,
}

impl Resolver {
    pub fn new(ctx: Rc<RefCell<CompilerCtx>>) -> Self {
        let mut globals = Env::new();
        {
            let mut ctx_borrow = ctx.borrow_mut();
            for builtin in BUILTINS.iter() {
                let id = ctx_borrow.symbols.declare(builtin.to_symbol());
                globals.add(builtin.name, id);
            }
        }
        Self {
            ctx,
            scope: ScopeCtx::new(globals),
        }
    }

    pub fn resolve(&mut self, nodes: &mut [AstNode]) -> ResolverResult {
        for node in nodes {
            self.declare_symbol(node)?;
        }
        debug!("resolved {} top-level binding(s)", self.scope.env().len());
        Ok(())
    }

    fn declare_symbol(&mut self, node: &mut AstNode) -> ResolverResult {
        match node {
            AstNode::Decl(decl) => self.declare_var_decl(decl),
            AstNode::FuncProto(proto) => self.declare_prototype(proto),
            AstNode::FuncDef(def) => self.declare_function(def),
        }
    }

    fn declare_var_decl(&mut self, decl: &mut VarDeclStmt) -> ResolverResult {
        let level = self.scope.level();
        let base = decl.base;
        for declarator in &mut decl.declarators {
            let span = declarator.meta.span;
            let ty = Self::declarator_type(base, declarator)?;
            if level == GLOBAL_LEVEL {
                self.check_label_name(&declarator.name, span)?;
            }

            if let Some((_, existing)) = self.lookup(&declarator.name) {
                let clashes = existing.kind.is_callable()
                    || existing.level == GLOBAL_LEVEL
                    || (existing.kind == SymbolKind::Variable && existing.level == level);
                if clashes {
                    return Err(Self::already_defined(&declarator.name, span));
                }
                if existing.kind == SymbolKind::Parameter {
                    self.warn(Diagnostic::warning(
                        ErrorKind::NameError,
                        ErrCode::SEM2004,
                        span,
                        format!("local '{}' shadows a parameter", declarator.name),
                    ))?;
                }
            }

            let id = self.new_symbol(Symbol::new(&declarator.name, level, SymbolKind::Variable, ty));
            self.scope.declare(&declarator.name, id);
            declarator.sym = Some(id);
            trace!("'{}' bound at level {level}", declarator.name);
        }
        Ok(())
    }

    fn declarator_type(base: BaseTy, declarator: &Declarator) -> ResolverResult<Ty> {
        let span = declarator.meta.span;
        if base != BaseTy::Int {
            return Err(Diagnostic::type_error(
                ErrCode::TYP4009,
                span,
                format!("variable '{}' must be declared 'int'", declarator.name),
            ));
        }
        let mut ty = Ty::Int;
        if declarator.pointer {
            ty = Ty::pointer_to(ty);
        }
        match declarator.array_len {
            Some(0) => Err(Diagnostic::type_error(
                ErrCode::TYP4009,
                span,
                format!("array '{}' must have a positive length", declarator.name),
            )),
            Some(len) => {
                // frame offsets and data sizes are 32-bit immediates
                let fits = len
                    .checked_mul(WORD_SIZE)
                    .is_some_and(|bytes| i32::try_from(bytes).is_ok());
                if !fits {
                    return Err(Diagnostic::type_error(
                        ErrCode::TYP4010,
                        span,
                        format!("array '{}' is too large", declarator.name),
                    ));
                }
                Ok(Ty::array_of(ty, len))
            }
            None => Ok(ty),
        }
    }

    /// File-scope names are emitted as labels and must not collide with the
    /// generated ones.
    fn check_label_name(&self, name: &str, span: Span) -> ResolverResult {
        if self.ctx.borrow().config.is_reserved_label(name) {
            return Err(Diagnostic::name_error(
                ErrCode::SEM2005,
                span,
                format!("'{name}' is reserved for generated labels"),
            ));
        }
        Ok(())
    }

    /// Binds the parameters into the (already opened) parameter scope and
    /// returns their types.
    fn declare_params(&mut self, params: &mut [ParamDecl]) -> ResolverResult<Vec<Ty>> {
        let mut types = Vec::with_capacity(params.len());
        for param in params {
            let span = param.meta.span;
            if param.base != BaseTy::Int {
                return Err(Diagnostic::type_error(
                    ErrCode::TYP4009,
                    span,
                    format!("parameter '{}' must be declared 'int'", param.name),
                ));
            }
            if let Some((_, existing)) = self.lookup(&param.name) {
                if existing.kind == SymbolKind::Parameter || existing.level == GLOBAL_LEVEL {
                    return Err(Self::already_defined(&param.name, span));
                }
            }
            let ty = if param.pointer { Ty::pointer_to(Ty::Int) } else { Ty::Int };
            let id = self.new_symbol(Symbol::new(&param.name, PARAM_LEVEL, SymbolKind::Parameter, ty.clone()));
            self.scope.declare(&param.name, id);
            param.sym = Some(id);
            types.push(ty);
        }
        Ok(types)
    }

    fn return_type(decl: &FuncDecl) -> ResolverResult<Ty> {
        let base = match decl.ret {
            BaseTy::Int => Ty::Int,
            BaseTy::Void => Ty::Void,
        };
        if !decl.pointer_ret {
            return Ok(base);
        }
        if base == Ty::Void {
            return Err(Diagnostic::type_error(
                ErrCode::TYP4009,
                decl.meta.span,
                format!("function '{}' cannot return 'void*'", decl.name),
            ));
        }
        Ok(Ty::pointer_to(base))
    }

    fn declare_prototype(&mut self, proto: &mut FuncDecl) -> ResolverResult {
        let span = proto.meta.span;
        self.check_label_name(&proto.name, span)?;
        let ret = Self::return_type(proto)?;

        self.scope.enter(ScopeType::Params);
        let params = self.declare_params(&mut proto.params);
        self.scope.exit();
        let ty = Ty::function(ret, params?);

        match self.lookup(&proto.name) {
            Some((id, existing)) if existing.kind.is_callable() => {
                if existing.ty != ty {
                    return Err(Self::conflicting_types(&proto.name, &existing.ty, &ty, span));
                }
                proto.sym = Some(id);
            }
            Some(_) => return Err(Self::already_defined(&proto.name, span)),
            None => {
                let id = self.new_symbol(Symbol::new(&proto.name, GLOBAL_LEVEL, SymbolKind::Prototype, ty));
                self.scope.declare(&proto.name, id);
                proto.sym = Some(id);
            }
        }
        Ok(())
    }

    fn declare_function(&mut self, def: &mut FuncDef) -> ResolverResult {
        let span = def.decl.meta.span;
        let name = def.decl.name.clone();
        self.check_label_name(&name, span)?;
        let ret = Self::return_type(&def.decl)?;
        debug!("resolving function '{name}'");

        // parameters stay visible until the body is done
        self.scope.enter(ScopeType::Params);
        let ty = Ty::function(ret, self.declare_params(&mut def.decl.params)?);

        if let Some((_, existing)) = self.lookup(&name) {
            match existing.kind {
                SymbolKind::Prototype if existing.ty == ty => {}
                SymbolKind::Prototype => {
                    return Err(Self::conflicting_types(&name, &existing.ty, &ty, span));
                }
                _ => return Err(Self::already_defined(&name, span)),
            }
        }

        let id = self.new_symbol(Symbol::new(&name, GLOBAL_LEVEL, SymbolKind::Function, ty));
        self.scope.declare(&name, id);
        def.decl.sym = Some(id);

        self.resolve_compound(&mut def.body)?;

        if self.scope.exit().is_none() {
            return Err(Diagnostic::internal(Some(span), "parameter scope was already closed"));
        }
        self.scope.declare(&name, id);
        Ok(())
    }

    fn resolve_compound(&mut self, block: &mut CompoundStmt) -> ResolverResult {
        let level = self.scope.enter(ScopeType::Block);
        trace!("entering block at level {level}");
        for decl in &mut block.decls {
            self.declare_var_decl(decl)?;
        }
        for stmt in &mut block.stmts {
            self.resolve_stmt(stmt)?;
        }
        if self.scope.exit().is_none() {
            return Err(Diagnostic::internal(Some(block.meta.span), "block scope was already closed"));
        }
        Ok(())
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) -> ResolverResult {
        match &mut stmt.kind {
            StmtKind::Empty => Ok(()),
            StmtKind::Expr(expr) => self.resolve_expr(expr),
            StmtKind::If { cond, then_branch, else_branch } => {
                self.resolve_expr(cond)?;
                self.resolve_stmt(then_branch)?;
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch)?;
                }
                Ok(())
            }
            StmtKind::While { cond, body } => {
                self.resolve_expr(cond)?;
                self.resolve_stmt(body)
            }
            StmtKind::Return(Some(value)) => self.resolve_expr(value),
            StmtKind::Return(None) => Ok(()),
            StmtKind::Compound(block) => self.resolve_compound(block),
        }
    }

    fn resolve_expr(&mut self, expr: &mut Expr) -> ResolverResult {
        let span = expr.meta.span;
        match &mut expr.kind {
            ExprKind::Num(_) => Ok(()),
            ExprKind::Ident(ident) => self.resolve_object(ident, span),
            ExprKind::Assign { target, value } => {
                self.resolve_expr(target)?;
                self.resolve_expr(value)
            }
            ExprKind::Binary { lhs, rhs, .. } => {
                self.resolve_expr(lhs)?;
                self.resolve_expr(rhs)
            }
            ExprKind::AddrOf(operand) | ExprKind::Deref(operand) => self.resolve_expr(operand),
            ExprKind::Call { callee, args } => {
                self.resolve_callee(callee, span)?;
                for arg in args {
                    self.resolve_expr(arg)?;
                }
                Ok(())
            }
            ExprKind::Comma(exprs) => {
                for e in exprs {
                    self.resolve_expr(e)?;
                }
                Ok(())
            }
        }
    }

    fn resolve_object(&mut self, ident: &mut IdentRef, span: Span) -> ResolverResult {
        match self.lookup(&ident.name) {
            Some((id, sym)) if sym.kind.is_object() => {
                ident.sym = Some(id);
                Ok(())
            }
            Some(_) => Err(Diagnostic::name_error(
                ErrCode::SEM2002,
                span,
                format!("'{}' is a function", ident.name),
            )),
            None => Err(Self::undefined(&ident.name, span)),
        }
    }

    fn resolve_callee(&mut self, callee: &mut IdentRef, span: Span) -> ResolverResult {
        match self.lookup(&callee.name) {
            Some((id, sym)) if sym.kind.is_callable() => {
                callee.sym = Some(id);
                Ok(())
            }
            Some(_) => Err(Diagnostic::name_error(
                ErrCode::SEM2002,
                span,
                format!("'{}' is not a function", callee.name),
            )),
            None => Err(Self::undefined(&callee.name, span)),
        }
    }

    fn lookup(&self, name: &str) -> Option<(SymbolId, Symbol)> {
        let id = self.scope.lookup(name)?;
        let sym = self.ctx.borrow().symbol(id).cloned()?;
        Some((id, sym))
    }

    fn new_symbol(&mut self, sym: Symbol) -> SymbolId {
        self.ctx.borrow_mut().symbols.declare(sym)
    }

    fn warn(&mut self, diag: Diagnostic) -> ResolverResult {
        warn!("{diag}");
        let mut ctx_borrow = self.ctx.borrow_mut();
        if ctx_borrow.config.warnings_as_errors {
            return Err(diag.promote());
        }
        ctx_borrow.diagnostics.push(diag);
        Ok(())
    }

    fn already_defined(name: &str, span: Span) -> Diagnostic {
        Diagnostic::name_error(ErrCode::SEM2001, span, format!("'{name}' is already defined"))
    }

    fn undefined(name: &str, span: Span) -> Diagnostic {
        Diagnostic::name_error(ErrCode::SEM2000, span, format!("'{name}' is not defined"))
    }

    fn conflicting_types(name: &str, declared: &Ty, found: &Ty, span: Span) -> Diagnostic {
        Diagnostic::name_error(
            ErrCode::SEM2003,
            span,
            format!("conflicting types for '{name}': declared '{declared}', found '{found}'"),
        )
    }
}
