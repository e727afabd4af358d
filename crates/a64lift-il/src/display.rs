//! Text rendering for lifted IL.

use std::fmt;

use crate::expr::{BinaryOp, ExprId, Label, LowLevelIlExpr, LowLevelIlFunction, RegisterId};

/// Resolves register identifiers to display names.
pub trait RegisterNames {
    /// Name for `reg`, if known.
    fn register_name(&self, reg: RegisterId) -> Option<&str>;
}

/// Renders a function one instruction per line, branch targets resolved to
/// instruction indexes.
pub struct FunctionDisplay<'a> {
    il: &'a LowLevelIlFunction,
    names: Option<&'a dyn RegisterNames>,
}

impl LowLevelIlFunction {
    /// Render with bare register ids.
    #[must_use]
    pub const fn display(&self) -> FunctionDisplay<'_> {
        FunctionDisplay {
            il: self,
            names: None,
        }
    }

    /// Render with register names resolved through `names`.
    #[must_use]
    pub fn display_with<'a>(&'a self, names: &'a dyn RegisterNames) -> FunctionDisplay<'a> {
        FunctionDisplay {
            il: self,
            names: Some(names),
        }
    }
}

impl fmt::Display for FunctionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, &instr) in self.il.instructions().iter().enumerate() {
            write!(f, "{index:>3}: ")?;
            self.fmt_expr(f, instr)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FunctionDisplay<'_> {
    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>, id: ExprId) -> fmt::Result {
        match self.il.expr(id) {
            LowLevelIlExpr::Const { value, .. } => write!(f, "{value:#x}"),
            LowLevelIlExpr::Register { reg, .. } => self.fmt_reg(f, reg),
            LowLevelIlExpr::Flag(condition) => write!(f, "flag({condition})"),
            LowLevelIlExpr::Binary { op, lhs, rhs, .. } => {
                write!(f, "(")?;
                self.fmt_expr(f, lhs)?;
                write!(f, " {} ", symbol(op))?;
                self.fmt_expr(f, rhs)?;
                write!(f, ")")
            }
            LowLevelIlExpr::SetRegister { reg, value, .. } => {
                self.fmt_reg(f, reg)?;
                write!(f, " = ")?;
                self.fmt_expr(f, value)
            }
            LowLevelIlExpr::If {
                condition,
                true_target,
                false_target,
            } => {
                write!(f, "if ")?;
                self.fmt_condition(f, condition)?;
                write!(f, " then ")?;
                self.fmt_target(f, true_target)?;
                write!(f, " else ")?;
                self.fmt_target(f, false_target)
            }
            LowLevelIlExpr::Goto(target) => {
                write!(f, "goto ")?;
                self.fmt_target(f, target)
            }
            LowLevelIlExpr::Unimplemented => write!(f, "unimplemented"),
        }
    }

    /// Flag conditions read better unwrapped in branch position.
    fn fmt_condition(&self, f: &mut fmt::Formatter<'_>, id: ExprId) -> fmt::Result {
        if let LowLevelIlExpr::Flag(condition) = self.il.expr(id) {
            write!(f, "({condition})")
        } else {
            self.fmt_expr(f, id)
        }
    }

    fn fmt_reg(&self, f: &mut fmt::Formatter<'_>, reg: RegisterId) -> fmt::Result {
        match self.names.and_then(|names| names.register_name(reg)) {
            Some(name) => f.write_str(name),
            None => write!(f, "r{}", reg.0),
        }
    }

    fn fmt_target(&self, f: &mut fmt::Formatter<'_>, label: Label) -> fmt::Result {
        match self.il.label_target(label) {
            Some(index) => write!(f, "{index}"),
            None => f.write_str("?"),
        }
    }
}

const fn symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Mult => "*",
        BinaryOp::And => "&",
        BinaryOp::Or => "|",
        BinaryOp::ShiftLeft => "<<",
        BinaryOp::RotateRight => "ror",
    }
}
