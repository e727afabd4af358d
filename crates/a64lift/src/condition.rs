//! AArch64 condition codes and their flag-expression mapping.

use a64lift_il::FlagCondition;

/// Condition code field of a conditional AArch64 instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConditionCode {
    /// No condition attached, or the decoder could not classify one.
    Invalid,
    Eq,
    Ne,
    Hs,
    Lo,
    Mi,
    Pl,
    Vs,
    Vc,
    Hi,
    Ls,
    Ge,
    Lt,
    Gt,
    Le,
    /// Always; encodable but never a real predicate.
    Al,
    /// Never; behaves as always on AArch64.
    Nv,
}

/// Map a condition code to the flag expression the IL tests.
///
/// `Al` and `Nv` both execute unconditionally and carry no flag semantics,
/// so they map to `None` alongside `Invalid`; translators handle them
/// without emitting a branch. The unsigned strict comparisons collapse onto
/// their non-strict neighbours: `Hs` and `Hi` both test `uge`, `Lo` and
/// `Ls` both test `ule`.
#[must_use]
pub const fn flag_condition(cond: ConditionCode) -> Option<FlagCondition> {
    match cond {
        ConditionCode::Eq => Some(FlagCondition::Equal),
        ConditionCode::Ne => Some(FlagCondition::NotEqual),
        ConditionCode::Hs | ConditionCode::Hi => Some(FlagCondition::UnsignedGreaterOrEqual),
        ConditionCode::Lo | ConditionCode::Ls => Some(FlagCondition::UnsignedLessOrEqual),
        ConditionCode::Mi => Some(FlagCondition::Negative),
        ConditionCode::Pl => Some(FlagCondition::Positive),
        ConditionCode::Vs => Some(FlagCondition::Overflow),
        ConditionCode::Vc => Some(FlagCondition::NoOverflow),
        ConditionCode::Ge => Some(FlagCondition::SignedGreaterOrEqual),
        ConditionCode::Lt => Some(FlagCondition::SignedLessThan),
        ConditionCode::Gt => Some(FlagCondition::SignedGreaterThan),
        ConditionCode::Le => Some(FlagCondition::SignedLessOrEqual),
        ConditionCode::Invalid | ConditionCode::Al | ConditionCode::Nv => None,
    }
}
