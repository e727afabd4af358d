//! Worker-confined decoding through the Capstone engine.
//!
//! The engine is not safe for concurrent use, so each worker thread lazily
//! constructs and exclusively owns one [`Disassembler`]. The thread-local
//! slot drops it, and with it the underlying engine, on thread exit.

use capstone::arch::arm64::{Arm64CC, Arm64OperandType, ArchMode};
use capstone::prelude::*;

use crate::condition::ConditionCode;
use crate::error::{Error, Result};

/// Operand kinds the translators understand; everything else is `Other`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    /// Register operand, carrying the engine's register name.
    Register(String),
    /// Immediate operand.
    Immediate(i64),
    /// Any other operand kind.
    Other,
}

/// One decoded instruction.
///
/// Immutable once produced; owned by the dispatcher for the duration of a
/// single lift call and dropped when that call returns.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DecodedInstruction {
    /// Engine opcode identity.
    pub id: u32,
    /// Encoded length in bytes.
    pub size: usize,
    /// Virtual address the bytes were decoded at.
    pub address: u64,
    /// Mnemonic text, for trace logging and the disassembly surface.
    pub mnemonic: String,
    /// Operand text, same purpose.
    pub op_str: String,
    /// Condition code attached to the instruction, if any.
    pub cond: ConditionCode,
    /// Ordered operands.
    pub operands: Vec<Operand>,
}

/// Owns one engine handle configured for AArch64 with detailed operands.
pub struct Disassembler {
    cs: Capstone,
}

thread_local! {
    static DISASSEMBLER: std::result::Result<Disassembler, String> =
        Disassembler::new().map_err(|e| e.to_string());
}

impl Disassembler {
    fn new() -> std::result::Result<Self, capstone::Error> {
        let cs = Capstone::new()
            .arm64()
            .mode(ArchMode::Arm)
            .detail(true)
            .build()?;
        Ok(Self { cs })
    }

    /// Run `f` against this worker's engine.
    ///
    /// The engine is created on the worker's first use; `f` receives `None`
    /// when that creation failed, which callers treat as a decode miss.
    pub fn with<R>(f: impl FnOnce(Option<&Self>) -> R) -> R {
        DISASSEMBLER.with(|engine| f(engine.as_ref().ok()))
    }

    /// Engine readiness for this worker, for startup checks.
    ///
    /// # Errors
    ///
    /// Returns the construction failure when the engine could not be
    /// created.
    pub fn check() -> Result<()> {
        DISASSEMBLER.with(|engine| match engine {
            Ok(_) => Ok(()),
            Err(message) => Err(Error::EngineInit(message.clone())),
        })
    }

    /// Decode at most one instruction from `data` at `address`.
    ///
    /// Returns `None` when the engine decodes nothing from the buffer.
    #[must_use]
    pub fn decode(&self, data: &[u8], address: u64) -> Option<DecodedInstruction> {
        let insns = self.cs.disasm_count(data, address, 1).ok()?;
        let insn = insns.iter().next()?;
        let detail = self.cs.insn_detail(insn).ok()?;
        let arch = detail.arch_detail();
        let arm64 = arch.arm64()?;

        let operands = arm64
            .operands()
            .map(|operand| match operand.op_type {
                Arm64OperandType::Reg(reg) => self
                    .cs
                    .reg_name(reg)
                    .map_or(Operand::Other, Operand::Register),
                Arm64OperandType::Imm(value) => Operand::Immediate(value),
                _ => Operand::Other,
            })
            .collect();

        Some(DecodedInstruction {
            id: insn.id().0,
            size: insn.bytes().len(),
            address: insn.address(),
            mnemonic: insn.mnemonic().unwrap_or_default().to_string(),
            op_str: insn.op_str().unwrap_or_default().to_string(),
            cond: arm64.cc().into(),
            operands,
        })
    }
}

impl From<Arm64CC> for ConditionCode {
    fn from(cc: Arm64CC) -> Self {
        match cc {
            Arm64CC::ARM64_CC_EQ => Self::Eq,
            Arm64CC::ARM64_CC_NE => Self::Ne,
            Arm64CC::ARM64_CC_HS => Self::Hs,
            Arm64CC::ARM64_CC_LO => Self::Lo,
            Arm64CC::ARM64_CC_MI => Self::Mi,
            Arm64CC::ARM64_CC_PL => Self::Pl,
            Arm64CC::ARM64_CC_VS => Self::Vs,
            Arm64CC::ARM64_CC_VC => Self::Vc,
            Arm64CC::ARM64_CC_HI => Self::Hi,
            Arm64CC::ARM64_CC_LS => Self::Ls,
            Arm64CC::ARM64_CC_GE => Self::Ge,
            Arm64CC::ARM64_CC_LT => Self::Lt,
            Arm64CC::ARM64_CC_GT => Self::Gt,
            Arm64CC::ARM64_CC_LE => Self::Le,
            Arm64CC::ARM64_CC_AL => Self::Al,
            Arm64CC::ARM64_CC_NV => Self::Nv,
            Arm64CC::ARM64_CC_INVALID => Self::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstone::arch::arm64::Arm64Insn;

    // csinc w0, w1, w2, eq
    const CSINC_W: [u8; 4] = [0x20, 0x04, 0x82, 0x1A];
    // add x0, x0, #1
    const ADD_IMM: [u8; 4] = [0x00, 0x04, 0x00, 0x91];

    #[test]
    fn test_decode_conditional_select() {
        Disassembler::with(|engine| {
            let instr = engine.unwrap().decode(&CSINC_W, 0x1000).unwrap();
            assert_eq!(instr.id, Arm64Insn::ARM64_INS_CSINC as u32);
            assert_eq!(instr.size, 4);
            assert_eq!(instr.address, 0x1000);
            assert_eq!(instr.mnemonic, "csinc");
            assert_eq!(instr.cond, ConditionCode::Eq);
            assert_eq!(
                instr.operands,
                vec![
                    Operand::Register("w0".into()),
                    Operand::Register("w1".into()),
                    Operand::Register("w2".into()),
                ]
            );
        });
    }

    #[test]
    fn test_decode_immediate_operand() {
        Disassembler::with(|engine| {
            let instr = engine.unwrap().decode(&ADD_IMM, 0).unwrap();
            assert_eq!(instr.id, Arm64Insn::ARM64_INS_ADD as u32);
            assert_eq!(instr.cond, ConditionCode::Invalid);
            assert_eq!(instr.operands[2], Operand::Immediate(1));
        });
    }

    #[test]
    fn test_decode_short_buffer() {
        Disassembler::with(|engine| {
            assert_eq!(engine.unwrap().decode(&CSINC_W[..2], 0), None);
        });
    }

    #[test]
    fn test_engine_is_ready() {
        assert!(Disassembler::check().is_ok());
    }
}
