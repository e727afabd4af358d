//! Custom base architecture example.
//!
//! Implements the [`Architecture`] trait for a base lifter of your own and
//! wraps it with the extension directly, without going through the registry.
//! The base here counts how often the extension falls back to it, which shows
//! which instructions the extension translates itself.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example custom_base
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use a64lift::{Aarch64Base, Aarch64Extension, Architecture, RegisterInfo};
use a64lift_il::{LowLevelIlFunction, RegisterId};

// ror w0, w1, #1
const ROR_IMM: [u8; 4] = [0x20, 0x04, 0x81, 0x13];
// nop
const NOP: [u8; 4] = [0x1F, 0x20, 0x03, 0xD5];

/// Baseline lifter that counts fallback calls before delegating.
struct CountingBase {
    fallbacks: Arc<AtomicUsize>,
    inner: Aarch64Base,
}

impl Architecture for CountingBase {
    fn name(&self) -> &str {
        "aarch64"
    }

    fn register_by_name(&self, name: &str) -> Option<RegisterId> {
        self.inner.register_by_name(name)
    }

    fn register_info(&self, reg: RegisterId) -> Option<&RegisterInfo> {
        self.inner.register_info(reg)
    }

    fn lift_instruction(
        &self,
        data: &[u8],
        address: u64,
        length: &mut usize,
        il: &mut LowLevelIlFunction,
    ) -> bool {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
        self.inner.lift_instruction(data, address, length, il)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fallbacks = Arc::new(AtomicUsize::new(0));
    let base = CountingBase {
        fallbacks: Arc::clone(&fallbacks),
        inner: Aarch64Base::new(),
    };
    let arch = Aarch64Extension::new(Box::new(base));

    let program = [("ror w0, w1, #1", ROR_IMM), ("nop", NOP)];

    let mut address = 0x1000u64;
    for (text, bytes) in program {
        let mut il = LowLevelIlFunction::new();
        let mut length = 0;
        let before = fallbacks.load(Ordering::Relaxed);
        if !arch.lift_instruction(&bytes, address, &mut length, &mut il) {
            return Err(format!("{text} was not lifted").into());
        }
        let source = if fallbacks.load(Ordering::Relaxed) == before {
            "extension"
        } else {
            "fallback"
        };
        println!("{address:#x}  {text:<16} {source} ({} IL instructions)", il.len());
        address += length as u64;
    }

    Ok(())
}
