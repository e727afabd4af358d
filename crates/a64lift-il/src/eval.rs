//! Tree-walking evaluator for lifted IL.
//!
//! Executes a [`LowLevelIlFunction`] against a concrete register file and
//! flag state, following branches through bound labels. Used by tests to
//! check translated semantics and by the CLI's eval mode.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::expr::{BinaryOp, ExprId, Label, LowLevelIlExpr, LowLevelIlFunction, RegisterId};
use crate::flag::FlagCondition;

/// Evaluation failures. IL from a correct lifter never produces these; they
/// guard against malformed hand-built functions.
#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum EvalError {
    #[error("branch to a label that was never marked")]
    UnboundLabel,
    #[error("unimplemented IL reached during evaluation")]
    Unimplemented,
    #[error("statement node used in expression position")]
    StatementOperand,
    #[error("step budget exhausted; the function does not terminate")]
    StepBudget,
}

/// Architectural flag state consumed by [`FlagCondition`] tests.
#[derive(Clone, Copy, Default, Debug)]
pub struct Flags {
    pub negative: bool,
    pub zero: bool,
    pub carry: bool,
    pub overflow: bool,
}

/// Bound on instructions executed per [`Evaluator::run`] call.
const STEP_BUDGET: usize = 1 << 16;

/// Interprets IL against concrete register and flag state.
///
/// Register slots are keyed by [`RegisterId`] and hold full 64-bit values;
/// reads and writes mask to the width carried on each expression.
#[derive(Default, Debug)]
pub struct Evaluator {
    regs: FxHashMap<RegisterId, u64>,
    flags: Flags,
}

impl Evaluator {
    /// Create an evaluator with all registers zero and all flags clear.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the flag state.
    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    /// Write a register slot.
    pub fn write_register(&mut self, reg: RegisterId, value: u64) {
        self.regs.insert(reg, value);
    }

    /// Read a register slot; unwritten slots read as zero.
    #[must_use]
    pub fn register(&self, reg: RegisterId) -> u64 {
        self.regs.get(&reg).copied().unwrap_or(0)
    }

    /// All written register slots, in id order.
    #[must_use]
    pub fn written_registers(&self) -> Vec<(RegisterId, u64)> {
        let mut regs: Vec<_> = self.regs.iter().map(|(&reg, &value)| (reg, value)).collect();
        regs.sort_unstable_by_key(|&(reg, _)| reg.0);
        regs
    }

    /// Run `il` from its first instruction until control falls off the end.
    ///
    /// # Errors
    ///
    /// Fails on a branch to an unbound label, on reaching `Unimplemented`
    /// IL, or when the step budget is exhausted.
    pub fn run(&mut self, il: &LowLevelIlFunction) -> Result<(), EvalError> {
        let mut pc = 0;
        let mut steps = 0;
        while pc < il.len() {
            steps += 1;
            if steps > STEP_BUDGET {
                return Err(EvalError::StepBudget);
            }
            pc = self.step(il, pc)?;
        }
        Ok(())
    }

    fn step(&mut self, il: &LowLevelIlFunction, pc: usize) -> Result<usize, EvalError> {
        match il.expr(il.instructions()[pc]) {
            LowLevelIlExpr::SetRegister { size, reg, value } => {
                let value = self.eval(il, value)?;
                self.regs.insert(reg, value & mask(size));
                Ok(pc + 1)
            }
            LowLevelIlExpr::If {
                condition,
                true_target,
                false_target,
            } => {
                let taken = self.eval(il, condition)? != 0;
                target(il, if taken { true_target } else { false_target })
            }
            LowLevelIlExpr::Goto(label) => target(il, label),
            LowLevelIlExpr::Unimplemented => Err(EvalError::Unimplemented),
            // A bare expression in the body has no effect.
            _ => Ok(pc + 1),
        }
    }

    fn eval(&self, il: &LowLevelIlFunction, id: ExprId) -> Result<u64, EvalError> {
        match il.expr(id) {
            LowLevelIlExpr::Const { size, value } => Ok(value & mask(size)),
            LowLevelIlExpr::Register { size, reg } => Ok(self.register(reg) & mask(size)),
            LowLevelIlExpr::Flag(condition) => Ok(u64::from(self.condition_holds(condition))),
            LowLevelIlExpr::Binary { op, size, lhs, rhs } => {
                let lhs = self.eval(il, lhs)?;
                let rhs = self.eval(il, rhs)?;
                Ok(apply(op, size, lhs, rhs) & mask(size))
            }
            LowLevelIlExpr::SetRegister { .. }
            | LowLevelIlExpr::If { .. }
            | LowLevelIlExpr::Goto(_)
            | LowLevelIlExpr::Unimplemented => Err(EvalError::StatementOperand),
        }
    }

    /// Standard NZCV predicates.
    const fn condition_holds(&self, condition: FlagCondition) -> bool {
        let Flags {
            negative,
            zero,
            carry,
            overflow,
        } = self.flags;
        match condition {
            FlagCondition::Equal => zero,
            FlagCondition::NotEqual => !zero,
            FlagCondition::UnsignedLessThan => !carry,
            FlagCondition::UnsignedGreaterOrEqual => carry,
            FlagCondition::UnsignedLessOrEqual => !carry || zero,
            FlagCondition::UnsignedGreaterThan => carry && !zero,
            FlagCondition::SignedLessThan => negative != overflow,
            FlagCondition::SignedGreaterOrEqual => negative == overflow,
            FlagCondition::SignedLessOrEqual => zero || negative != overflow,
            FlagCondition::SignedGreaterThan => !zero && negative == overflow,
            FlagCondition::Negative => negative,
            FlagCondition::Positive => !negative,
            FlagCondition::Overflow => overflow,
            FlagCondition::NoOverflow => !overflow,
        }
    }
}

fn target(il: &LowLevelIlFunction, label: Label) -> Result<usize, EvalError> {
    il.label_target(label).ok_or(EvalError::UnboundLabel)
}

/// All-ones mask for a byte width; widths of 8 or more cover the full word.
const fn mask(size: usize) -> u64 {
    if size >= 8 {
        u64::MAX
    } else {
        (1 << (size * 8)) - 1
    }
}

fn apply(op: BinaryOp, size: usize, lhs: u64, rhs: u64) -> u64 {
    let bits = 8 * size.clamp(1, 8) as u64;
    match op {
        BinaryOp::Add => lhs.wrapping_add(rhs),
        BinaryOp::Mult => lhs.wrapping_mul(rhs),
        BinaryOp::And => lhs & rhs,
        BinaryOp::Or => lhs | rhs,
        BinaryOp::ShiftLeft => {
            if rhs >= bits {
                0
            } else {
                lhs << rhs
            }
        }
        BinaryOp::RotateRight => rotate_right(bits, lhs, rhs),
    }
}

fn rotate_right(bits: u64, value: u64, amount: u64) -> u64 {
    let mask = if bits >= 64 { u64::MAX } else { (1 << bits) - 1 };
    let value = value & mask;
    let amount = amount % bits;
    if amount == 0 {
        value
    } else {
        (value >> amount) | ((value << (bits - amount)) & mask)
    }
}
