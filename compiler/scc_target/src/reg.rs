// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

/// The MIPS registers the code generator touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MipsReg {
    /// Return value and syscall number.
    V0,

    /// First syscall argument.
    A0,

    /// Scratch registers.
    T0,
    T1,

    Sp,
    Fp,
    Ra,
}

impl MipsReg {
    pub fn name(self) -> &'static str {
        match self {
            MipsReg::V0 => "$v0",
            MipsReg::A0 => "$a0",
            MipsReg::T0 => "$t0",
            MipsReg::T1 => "$t1",
            MipsReg::Sp => "$sp",
            MipsReg::Fp => "$fp",
            MipsReg::Ra => "$ra",
        }
    }

    /// `offset(reg)` memory operand.
    pub fn at(self, offset: i32) -> String {
        format!("{offset}({})", self.name())
    }
}

impl fmt::Display for MipsReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Syscall numbers understood by SPIM/MARS.
pub mod syscall {
    pub const PRINT_INT: i32 = 1;
    pub const PRINT_STRING: i32 = 4;
}
