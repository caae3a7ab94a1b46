// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use scc_ast::AstNode;
use scc_backend::{CodeGenerator, FrameLayout, MipsCodeGenerator};
use scc_ctx::builder::CompilerCtxBuilder;
use scc_ctx::{CompilerConfig, CompilerCtx};
use scc_errors::Diagnostic;
use scc_ir::IrItem;
use scc_lowering::AstToIrLowerer;
use scc_sema::SemanticAnalyzer;
use scc_target::{render, AsmInstr};

/// Output of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    pub instrs: Vec<AsmInstr>,

    /// Non-fatal findings, in the order they were reported.
    pub warnings: Vec<Diagnostic>,
}

impl CompiledProgram {
    pub fn asm(&self) -> String {
        render(&self.instrs)
    }
}

/// Runs resolution, type checking, lowering, frame layout and code
/// generation in order, stopping at the first error.
#[derive(Debug, Clone)]
pub struct CompilerPipeline {
    pub ctx: Rc<RefCell<CompilerCtx>>,
    config: CompilerConfig,
}

impl CompilerPipeline {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            ctx: CompilerCtxBuilder::new().config(config.clone()).build_shared(),
            config,
        }
    }

    /// Compiles one program. Each call starts from a fresh context; `ctx`
    /// keeps the state of the latest run for inspection.
    pub fn compile(&mut self, nodes: &mut [AstNode]) -> Result<CompiledProgram, Diagnostic> {
        self.ctx = CompilerCtxBuilder::new().config(self.config.clone()).build_shared();

        SemanticAnalyzer::new(self.ctx.clone()).analyze(nodes)?;
        debug!("semantic analysis finished");

        let mut items = self.compile_into_ir(nodes)?;
        let mut layout = FrameLayout::new(self.ctx.clone());
        for item in &mut items {
            if let IrItem::Func(func) = item {
                layout.assign(func)?;
            }
        }

        let instrs = MipsCodeGenerator::new(self.ctx.clone()).gen_program(&items)?;
        let warnings: Vec<Diagnostic> = self.ctx.borrow().diagnostics.warnings().cloned().collect();
        info!("compiled {} top-level item(s) with {} warning(s)", items.len(), warnings.len());
        Ok(CompiledProgram { instrs, warnings })
    }

    fn compile_into_ir(&mut self, nodes: &[AstNode]) -> Result<Vec<IrItem>, Diagnostic> {
        AstToIrLowerer::new(self.ctx.clone()).lower(nodes)
    }
}
