// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

use itertools::Itertools;

use crate::MipsReg;

/// One line of target assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInstr {
    Op {
        mnemonic: &'static str,
        operands: Vec<String>,
    },

    Label(String),

    Directive {
        name: &'static str,
        operands: Vec<String>,
    },
}

impl AsmInstr {
    pub fn op<I, S>(mnemonic: &'static str, operands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AsmInstr::Op {
            mnemonic,
            operands: operands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn label(name: impl Into<String>) -> Self {
        AsmInstr::Label(name.into())
    }

    pub fn directive<I, S>(name: &'static str, operands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AsmInstr::Directive {
            name,
            operands: operands.into_iter().map(Into::into).collect(),
        }
    }

    // shorthands for the instruction forms the code generator emits

    /// `lw reg, offset(base)`
    pub fn lw(reg: MipsReg, base: MipsReg, offset: i32) -> Self {
        Self::op("lw", [reg.name().to_string(), base.at(offset)])
    }

    /// `sw reg, offset(base)`
    pub fn sw(reg: MipsReg, base: MipsReg, offset: i32) -> Self {
        Self::op("sw", [reg.name().to_string(), base.at(offset)])
    }

    pub fn li(reg: MipsReg, value: i32) -> Self {
        Self::op("li", [reg.name().to_string(), value.to_string()])
    }

    pub fn la(reg: MipsReg, label: &str) -> Self {
        Self::op("la", [reg.name(), label])
    }

    pub fn addiu(dest: MipsReg, src: MipsReg, imm: i32) -> Self {
        Self::op("addiu", [dest.name().to_string(), src.name().to_string(), imm.to_string()])
    }

    pub fn subu(dest: MipsReg, src: MipsReg, imm: i32) -> Self {
        Self::op("subu", [dest.name().to_string(), src.name().to_string(), imm.to_string()])
    }
}

impl fmt::Display for AsmInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInstr::Op { mnemonic, operands } if operands.is_empty() => write!(f, "\t{mnemonic}"),
            AsmInstr::Op { mnemonic, operands } => write!(f, "\t{mnemonic} {}", operands.iter().join(",")),
            AsmInstr::Label(name) => write!(f, "{name}:"),
            AsmInstr::Directive { name, operands } if operands.is_empty() => write!(f, "\t{name}"),
            AsmInstr::Directive { name, operands } => write!(f, "\t{name} {}", operands.iter().join(",")),
        }
    }
}

/// Renders one instruction per line.
pub fn render(instrs: &[AsmInstr]) -> String {
    let mut out = instrs.iter().join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(AsmInstr::lw(MipsReg::T0, MipsReg::Fp, -4), "\tlw $t0,-4($fp)")]
    #[case(AsmInstr::la(MipsReg::T1, "counter"), "\tla $t1,counter")]
    #[case(AsmInstr::op("syscall", Vec::<String>::new()), "\tsyscall")]
    #[case(AsmInstr::op("add", ["$t0", "$t0", "$t1"]), "\tadd $t0,$t0,$t1")]
    #[case(AsmInstr::label("main"), "main:")]
    #[case(AsmInstr::directive(".word", ["0", "0"]), "\t.word 0,0")]
    #[case(AsmInstr::directive(".text", Vec::<String>::new()), "\t.text")]
    fn test_rendering(#[case] instr: AsmInstr, #[case] expected: &str) {
        assert_eq!(instr.to_string(), expected);
    }

    #[test]
    fn test_render_program() {
        let text = render(&[
            AsmInstr::label("main"),
            AsmInstr::li(MipsReg::V0, 10),
            AsmInstr::op("syscall", Vec::<String>::new()),
        ]);
        assert_eq!(text, "main:\n\tli $v0,10\n\tsyscall\n");
    }
}
