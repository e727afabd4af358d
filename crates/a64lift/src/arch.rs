//! Architecture abstraction, the baseline AArch64 lifter, and the registry.

use a64lift_il::{LowLevelIlFunction, RegisterId};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::decode::Disassembler;
use crate::registers::{RegisterInfo, RegisterTable};

/// A lifter for one instruction set.
///
/// Implementations translate machine code into low-level IL one instruction
/// at a time. An extension wraps another implementation and overrides a
/// subset of instructions, so the trait stays object-safe.
pub trait Architecture: Send + Sync {
    /// Architecture name used for registry lookup.
    fn name(&self) -> &str;

    /// Resolve a register name to its identifier.
    fn register_by_name(&self, name: &str) -> Option<RegisterId>;

    /// Width and canonical name of a register.
    fn register_info(&self, reg: RegisterId) -> Option<&RegisterInfo>;

    /// Lift one instruction at `address` into `il`.
    ///
    /// On success returns `true` with the encoded size stored in `length`.
    /// Returns `false` when the bytes cannot be lifted; `length` is then
    /// unspecified and callers must not trust it.
    fn lift_instruction(
        &self,
        data: &[u8],
        address: u64,
        length: &mut usize,
        il: &mut LowLevelIlFunction,
    ) -> bool;
}

/// Baseline AArch64 lifter.
///
/// Decodes with the worker's engine and emits an `unimplemented` marker for
/// every instruction. An extension wraps it to teach individual
/// instructions real semantics.
pub struct Aarch64Base {
    registers: RegisterTable,
}

impl Aarch64Base {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registers: RegisterTable::new(),
        }
    }
}

impl Default for Aarch64Base {
    fn default() -> Self {
        Self::new()
    }
}

impl Architecture for Aarch64Base {
    fn name(&self) -> &str {
        "aarch64"
    }

    fn register_by_name(&self, name: &str) -> Option<RegisterId> {
        self.registers.by_name(name)
    }

    fn register_info(&self, reg: RegisterId) -> Option<&RegisterInfo> {
        self.registers.info(reg)
    }

    fn lift_instruction(
        &self,
        data: &[u8],
        address: u64,
        length: &mut usize,
        il: &mut LowLevelIlFunction,
    ) -> bool {
        let Some(instr) =
            Disassembler::with(|engine| engine.and_then(|engine| engine.decode(data, address)))
        else {
            return false;
        };
        *length = instr.size;
        let marker = il.unimplemented();
        il.add_instruction(marker);
        true
    }
}

/// Registered architectures, keyed by name.
///
/// Registering a name that already exists replaces the previous entry, which
/// is how an extension takes over lifting for its base architecture.
#[derive(Default)]
pub struct ArchitectureRegistry {
    architectures: FxHashMap<String, Box<dyn Architecture>>,
}

impl ArchitectureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `arch` under its own name, replacing any previous entry.
    pub fn register(&mut self, arch: Box<dyn Architecture>) {
        let name = arch.name().to_string();
        debug!(arch = %name, "registering architecture");
        self.architectures.insert(name, arch);
    }

    /// Look up an architecture by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&dyn Architecture> {
        self.architectures.get(name).map(|arch| arch.as_ref())
    }

    /// Remove and return an architecture so it can be wrapped and
    /// re-registered.
    pub fn take(&mut self, name: &str) -> Option<Box<dyn Architecture>> {
        self.architectures.remove(name)
    }
}
