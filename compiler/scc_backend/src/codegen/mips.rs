// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use scc_ctx::CompilerCtx;
use scc_errors::{Diagnostic, ErrCode};
use scc_ir::*;
use scc_symbol::{Symbol, SymbolId};
use scc_target::{syscall, AsmInstr, MipsReg};
use scc_types::Ty;
use scc_utils::bug;

use crate::codegen::{CodeGenerator, CodegenResult};

const SCRATCH_REGISTER_0: MipsReg = MipsReg::T0;
const SCRATCH_REGISTER_1: MipsReg = MipsReg::T1;

/// Emits MIPS assembly for SPIM/MARS.
///
/// Every value lives in memory; `$t0` and `$t1` only carry operands from
/// one load to the following store.
pub struct MipsCodeGenerator {
    ctx: Rc<RefCell<CompilerCtx>>,
    code: Vec<AsmInstr>,
    next_label: usize,

    /// Frame of the function being emitted.
    frame: Option<FrameInfo>,
}

impl MipsCodeGenerator {
    pub fn new(ctx: Rc<RefCell<CompilerCtx>>) -> Self {
        Self {
            ctx,
            code: vec![],
            next_label: 0,
            frame: None,
        }
    }

    fn emit(&mut self, instr: AsmInstr) {
        self.code.push(instr);
    }

    fn emit_op<I, S>(&mut self, mnemonic: &'static str, operands: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.emit(AsmInstr::op(mnemonic, operands));
    }

    fn get_next_label(&mut self) -> String {
        let label = format!("{}{}", self.ctx.borrow().config.label_prefix, self.next_label);
        self.next_label += 1;
        label
    }

    fn symbol(&self, id: SymbolId) -> CodegenResult<Symbol> {
        self.ctx
            .borrow()
            .symbol(id)
            .cloned()
            .ok_or_else(|| Diagnostic::internal(None, format!("unknown symbol {id:?}")))
    }

    fn check_entry_point(&self, items: &[IrItem]) -> CodegenResult<String> {
        let entry = self.ctx.borrow().config.entry_point.clone();
        for func in items.iter().filter_map(IrItem::as_func) {
            if self.symbol(func.sym)?.name == entry {
                return Ok(entry);
            }
        }
        Err(Diagnostic::structural_error(
            ErrCode::STR5000,
            format!("no definition of '{entry}' found"),
        ))
    }

    fn gen_function(&mut self, func: &IrFunction) -> CodegenResult {
        let name = self.symbol(func.sym)?.name;
        let frame = func
            .frame
            .ok_or_else(|| Diagnostic::internal(None, format!("'{name}' has no frame layout")))?;
        debug!("emitting '{name}' with a {} byte frame", frame.frame_size);

        self.frame = Some(frame);
        self.emit(AsmInstr::label(name));
        self.emit_function_preamble(frame);
        self.gen_block(&func.body)?;
        // control must not run into the next function
        self.emit_function_postamble(frame);
        self.frame = None;
        Ok(())
    }

    fn emit_function_preamble(&mut self, frame: FrameInfo) {
        let frame_size = to_imm(frame.frame_size);
        self.emit(AsmInstr::subu(MipsReg::Sp, MipsReg::Sp, frame_size));
        self.emit(AsmInstr::sw(MipsReg::Ra, MipsReg::Sp, 4));
        self.emit(AsmInstr::sw(MipsReg::Fp, MipsReg::Sp, 0));
        self.emit(AsmInstr::addiu(MipsReg::Fp, MipsReg::Sp, to_imm(frame.local_size) + 4));
    }

    fn emit_function_postamble(&mut self, frame: FrameInfo) {
        self.emit(AsmInstr::lw(MipsReg::Ra, MipsReg::Sp, 4));
        self.emit(AsmInstr::lw(MipsReg::Fp, MipsReg::Sp, 0));
        self.emit(AsmInstr::addiu(MipsReg::Sp, MipsReg::Sp, to_imm(frame.frame_size)));
        self.emit_op("jr", [MipsReg::Ra.name()]);
    }

    fn gen_block(&mut self, block: &IrBlock) -> CodegenResult {
        for stmt in &block.stmts {
            self.gen_stmt(stmt)?;
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &IrStmt) -> CodegenResult {
        match stmt {
            IrStmt::Empty => {
                self.emit_op("nop", Vec::<String>::new());
                Ok(())
            }
            IrStmt::Block(block) => self.gen_block(block),
            IrStmt::If { cond, then_block, else_block } => {
                let else_label = self.get_next_label();
                let end_label = self.get_next_label();
                self.value_of(SCRATCH_REGISTER_0, *cond)?;
                self.emit_op("beqz", [SCRATCH_REGISTER_0.name(), else_label.as_str()]);
                self.gen_block(then_block)?;
                self.emit_op("j", [end_label.as_str()]);
                self.emit(AsmInstr::label(else_label));
                if let Some(else_block) = else_block {
                    self.gen_block(else_block)?;
                }
                self.emit(AsmInstr::label(end_label));
                Ok(())
            }
            IrStmt::While { cond_code, cond, body } => {
                let start_label = self.get_next_label();
                let end_label = self.get_next_label();
                self.emit(AsmInstr::label(start_label.clone()));
                for stmt in cond_code {
                    self.gen_stmt(stmt)?;
                }
                self.value_of(SCRATCH_REGISTER_0, *cond)?;
                self.emit_op("beqz", [SCRATCH_REGISTER_0.name(), end_label.as_str()]);
                self.gen_block(body)?;
                self.emit_op("j", [start_label]);
                self.emit(AsmInstr::label(end_label));
                Ok(())
            }
            IrStmt::Return(value) => {
                if let Some(value) = value {
                    self.value_of(MipsReg::V0, *value)?;
                }
                let frame = self
                    .frame
                    .ok_or_else(|| Diagnostic::internal(None, "return outside of a function"))?;
                self.emit_function_postamble(frame);
                Ok(())
            }
            IrStmt::Call { dest, callee, args } => self.gen_call(*dest, *callee, args),
            IrStmt::Print(value) => self.gen_print(*value),
            IrStmt::Assign { dest, expr } => {
                self.gen_expr(expr)?;
                self.store_var(SCRATCH_REGISTER_0, *dest)
            }
            IrStmt::Store { addr, src } => {
                self.value_of(SCRATCH_REGISTER_0, *src)?;
                self.value_of(SCRATCH_REGISTER_1, *addr)?;
                self.emit(AsmInstr::sw(SCRATCH_REGISTER_0, SCRATCH_REGISTER_1, 0));
                Ok(())
            }
            IrStmt::Load { dest, addr } => {
                self.value_of(SCRATCH_REGISTER_0, *addr)?;
                self.emit(AsmInstr::lw(SCRATCH_REGISTER_0, SCRATCH_REGISTER_0, 0));
                self.store_var(SCRATCH_REGISTER_0, *dest)
            }
        }
    }

    /// Leaves the value of `expr` in the first scratch register.
    fn gen_expr(&mut self, expr: &IrExpr) -> CodegenResult {
        let dest = SCRATCH_REGISTER_0;
        match expr {
            IrExpr::Var(var) => self.value_of(dest, *var),
            IrExpr::IntLit(value) => {
                self.emit(AsmInstr::li(dest, *value));
                Ok(())
            }
            IrExpr::Arith(op, lhs, rhs) => self.gen_binary(arith_mnemonic(*op), *lhs, *rhs),
            IrExpr::Rel(op, lhs, rhs) => self.gen_binary(rel_mnemonic(*op), *lhs, *rhs),
            IrExpr::AddrOf(var) => self.address_of(dest, *var),
        }
    }

    fn gen_binary(&mut self, mnemonic: &'static str, lhs: SymbolId, rhs: SymbolId) -> CodegenResult {
        self.value_of(SCRATCH_REGISTER_0, lhs)?;
        self.value_of(SCRATCH_REGISTER_1, rhs)?;
        self.emit_op(
            mnemonic,
            [SCRATCH_REGISTER_0.name(), SCRATCH_REGISTER_0.name(), SCRATCH_REGISTER_1.name()],
        );
        Ok(())
    }

    /// Arguments go into the words right below the caller's `$sp`, which
    /// become the top of the callee's frame.
    fn gen_call(&mut self, dest: SymbolId, callee: SymbolId, args: &[SymbolId]) -> CodegenResult {
        let callee = self.symbol(callee)?;
        let argc = args.len();
        for (idx, arg) in args.iter().enumerate() {
            self.value_of(SCRATCH_REGISTER_0, *arg)?;
            self.emit(AsmInstr::sw(SCRATCH_REGISTER_0, MipsReg::Sp, -to_imm(4 * (argc - idx))));
        }
        self.emit_op("jal", [callee.name]);
        self.store_var(MipsReg::V0, dest)
    }

    fn gen_print(&mut self, value: SymbolId) -> CodegenResult {
        let newline = self.ctx.borrow().config.newline_label.clone();
        self.emit(AsmInstr::li(MipsReg::V0, syscall::PRINT_INT));
        self.value_of(SCRATCH_REGISTER_0, value)?;
        self.emit_op("move", [MipsReg::A0.name(), SCRATCH_REGISTER_0.name()]);
        self.emit_op("syscall", Vec::<String>::new());
        self.emit(AsmInstr::li(MipsReg::V0, syscall::PRINT_STRING));
        self.emit(AsmInstr::la(MipsReg::A0, &newline));
        self.emit_op("syscall", Vec::<String>::new());
        Ok(())
    }

    fn frame_offset(sym: &Symbol) -> CodegenResult<i32> {
        sym.offset
            .ok_or_else(|| Diagnostic::internal(None, format!("'{}' has no frame offset", sym.name)))
    }

    /// Loads the word stored in `var`.
    fn load_var(&mut self, reg: MipsReg, var: SymbolId) -> CodegenResult {
        let sym = self.symbol(var)?;
        if sym.is_global() {
            self.emit(AsmInstr::la(reg, &sym.name));
            self.emit(AsmInstr::lw(reg, reg, 0));
        } else {
            self.emit(AsmInstr::lw(reg, MipsReg::Fp, Self::frame_offset(&sym)?));
        }
        Ok(())
    }

    /// Stores `reg` into `var`. Globals need the second scratch register for
    /// their address.
    fn store_var(&mut self, reg: MipsReg, var: SymbolId) -> CodegenResult {
        let sym = self.symbol(var)?;
        if sym.is_global() {
            self.emit(AsmInstr::la(SCRATCH_REGISTER_1, &sym.name));
            self.emit(AsmInstr::sw(reg, SCRATCH_REGISTER_1, 0));
        } else {
            self.emit(AsmInstr::sw(reg, MipsReg::Fp, Self::frame_offset(&sym)?));
        }
        Ok(())
    }

    fn address_of(&mut self, reg: MipsReg, var: SymbolId) -> CodegenResult {
        let sym = self.symbol(var)?;
        if sym.is_global() {
            self.emit(AsmInstr::la(reg, &sym.name));
        } else {
            self.emit(AsmInstr::addiu(reg, MipsReg::Fp, Self::frame_offset(&sym)?));
        }
        Ok(())
    }

    /// What naming `var` yields: the base address of an array, the stored
    /// word of anything else.
    fn value_of(&mut self, reg: MipsReg, var: SymbolId) -> CodegenResult {
        if self.symbol(var)?.is_array() {
            self.address_of(reg, var)
        } else {
            self.load_var(reg, var)
        }
    }

    fn gen_globals(&mut self, items: &[IrItem]) -> CodegenResult {
        for item in items {
            let IrItem::VarDecl(id) = item else {
                continue;
            };
            let sym = self.symbol(*id)?;
            // `value:count` repeats the word
            let init = match sym.ty {
                Ty::Array { len, .. } => format!("0:{len}"),
                _ => "0".to_string(),
            };
            self.emit(AsmInstr::label(sym.name));
            self.emit(AsmInstr::directive(".word", [init]));
        }
        Ok(())
    }
}

impl CodeGenerator for MipsCodeGenerator {
    fn gen_program(&mut self, items: &[IrItem]) -> CodegenResult<Vec<AsmInstr>> {
        let entry = self.check_entry_point(items)?;
        self.code.clear();

        self.emit(AsmInstr::directive(".text", Vec::<String>::new()));
        self.emit(AsmInstr::directive(".globl", [entry]));
        for func in items.iter().filter_map(IrItem::as_func) {
            self.gen_function(func)?;
        }

        let newline = self.ctx.borrow().config.newline_label.clone();
        self.emit(AsmInstr::directive(".data", Vec::<String>::new()));
        self.emit(AsmInstr::label(newline));
        self.emit(AsmInstr::directive(".asciiz", ["\"\\n\""]));
        self.gen_globals(items)?;

        debug!("emitted {} instructions", self.code.len());
        Ok(std::mem::take(&mut self.code))
    }
}

fn arith_mnemonic(op: IrArithOp) -> &'static str {
    match op {
        IrArithOp::Add => "add",
        IrArithOp::Sub => "sub",
        IrArithOp::Mul => "mul",
        IrArithOp::Div => "div",
    }
}

fn rel_mnemonic(op: IrRelOp) -> &'static str {
    match op {
        IrRelOp::Eq => "seq",
        IrRelOp::Ne => "sne",
        IrRelOp::Gt => "sgt",
        IrRelOp::Lt => "slt",
        IrRelOp::Ge => "sge",
        IrRelOp::Le => "sle",
    }
}

fn to_imm(value: usize) -> i32 {
    i32::try_from(value).unwrap_or_else(|_| bug!("immediate {value} does not fit a word"))
}
