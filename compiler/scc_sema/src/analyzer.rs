// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::cell::RefCell;
use std::rc::Rc;

use scc_ast::AstNode;
use scc_ctx::CompilerCtx;
use scc_errors::Diagnostic;

use crate::resolver::Resolver;
use crate::ty_checker::TypeChecker;

/// Runs name resolution followed by type checking.
pub struct SemanticAnalyzer {
    ctx: Rc<RefCell<CompilerCtx>>,
}

impl SemanticAnalyzer {
    pub fn new(ctx: Rc<RefCell<CompilerCtx>>) -> Self {
        Self { ctx }
    }

    pub fn analyze(&mut self, nodes: &mut [AstNode]) -> Result<(), Diagnostic> {
        Resolver::new(self.ctx.clone()).resolve(nodes)?;
        TypeChecker::new(self.ctx.clone()).check(nodes)
    }
}
