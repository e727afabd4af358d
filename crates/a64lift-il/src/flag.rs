//! Flag conditions for conditional IL.

use std::fmt;

/// Conditions testable against an architecture's flag state.
///
/// These are IL-level conditions; an architecture maps its own condition
/// codes onto them before building a conditional branch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FlagCondition {
    Equal,
    NotEqual,
    SignedLessThan,
    UnsignedLessThan,
    SignedLessOrEqual,
    UnsignedLessOrEqual,
    SignedGreaterOrEqual,
    UnsignedGreaterOrEqual,
    SignedGreaterThan,
    UnsignedGreaterThan,
    Negative,
    Positive,
    Overflow,
    NoOverflow,
}

impl FlagCondition {
    /// Short mnemonic used in rendered IL.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::NotEqual => "ne",
            Self::SignedLessThan => "slt",
            Self::UnsignedLessThan => "ult",
            Self::SignedLessOrEqual => "sle",
            Self::UnsignedLessOrEqual => "ule",
            Self::SignedGreaterOrEqual => "sge",
            Self::UnsignedGreaterOrEqual => "uge",
            Self::SignedGreaterThan => "sgt",
            Self::UnsignedGreaterThan => "ugt",
            Self::Negative => "neg",
            Self::Positive => "pos",
            Self::Overflow => "o",
            Self::NoOverflow => "no",
        }
    }
}

impl fmt::Display for FlagCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
