//! AArch64 general-register table.

use rustc_hash::FxHashMap;

use a64lift_il::RegisterId;

/// Byte width and display name for one register.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RegisterInfo {
    pub name: &'static str,
    pub size: usize,
}

const fn reg(name: &'static str, size: usize) -> RegisterInfo {
    RegisterInfo { name, size }
}

/// General registers in id order: the 64-bit file, the 32-bit file, then
/// stack pointers, zero registers, and the frame/link aliases.
static GENERAL_REGISTERS: &[RegisterInfo] = &[
    reg("x0", 8), reg("x1", 8), reg("x2", 8), reg("x3", 8), reg("x4", 8),
    reg("x5", 8), reg("x6", 8), reg("x7", 8), reg("x8", 8), reg("x9", 8),
    reg("x10", 8), reg("x11", 8), reg("x12", 8), reg("x13", 8), reg("x14", 8),
    reg("x15", 8), reg("x16", 8), reg("x17", 8), reg("x18", 8), reg("x19", 8),
    reg("x20", 8), reg("x21", 8), reg("x22", 8), reg("x23", 8), reg("x24", 8),
    reg("x25", 8), reg("x26", 8), reg("x27", 8), reg("x28", 8), reg("x29", 8),
    reg("x30", 8),
    reg("w0", 4), reg("w1", 4), reg("w2", 4), reg("w3", 4), reg("w4", 4),
    reg("w5", 4), reg("w6", 4), reg("w7", 4), reg("w8", 4), reg("w9", 4),
    reg("w10", 4), reg("w11", 4), reg("w12", 4), reg("w13", 4), reg("w14", 4),
    reg("w15", 4), reg("w16", 4), reg("w17", 4), reg("w18", 4), reg("w19", 4),
    reg("w20", 4), reg("w21", 4), reg("w22", 4), reg("w23", 4), reg("w24", 4),
    reg("w25", 4), reg("w26", 4), reg("w27", 4), reg("w28", 4), reg("w29", 4),
    reg("w30", 4),
    reg("sp", 8), reg("wsp", 4),
    reg("xzr", 8), reg("wzr", 4),
    reg("fp", 8), reg("lr", 8),
];

/// Name-keyed lookup over [`GENERAL_REGISTERS`].
#[derive(Debug)]
pub struct RegisterTable {
    by_name: FxHashMap<&'static str, RegisterId>,
}

impl RegisterTable {
    /// Build the lookup table.
    #[must_use]
    pub fn new() -> Self {
        let by_name = (0u32..)
            .zip(GENERAL_REGISTERS)
            .map(|(id, info)| (info.name, RegisterId(id)))
            .collect();
        Self { by_name }
    }

    /// Register id for `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<RegisterId> {
        self.by_name.get(name).copied()
    }

    /// Metadata for `reg`.
    #[must_use]
    pub fn info(&self, reg: RegisterId) -> Option<&'static RegisterInfo> {
        GENERAL_REGISTERS.get(reg.0 as usize)
    }

    /// Display name for `reg`.
    #[must_use]
    pub fn name(&self, reg: RegisterId) -> Option<&'static str> {
        self.info(reg).map(|info| info.name)
    }
}

impl Default for RegisterTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        let table = RegisterTable::new();
        for (name, size) in [("x0", 8), ("x30", 8), ("w7", 4), ("sp", 8), ("wsp", 4), ("xzr", 8), ("wzr", 4), ("fp", 8), ("lr", 8)] {
            let reg = table.by_name(name).unwrap();
            assert_eq!(table.info(reg).unwrap().size, size, "{name}");
        }
    }

    #[test]
    fn test_word_and_extended_files_are_distinct() {
        let table = RegisterTable::new();
        assert_ne!(table.by_name("x5"), table.by_name("w5"));
    }

    #[test]
    fn test_name_round_trip() {
        let table = RegisterTable::new();
        let reg = table.by_name("w19").unwrap();
        assert_eq!(table.name(reg), Some("w19"));
    }

    #[test]
    fn test_unknown_name() {
        let table = RegisterTable::new();
        assert_eq!(table.by_name("v0"), None);
        assert_eq!(table.by_name(""), None);
    }
}
