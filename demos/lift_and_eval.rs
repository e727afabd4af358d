//! Lift and evaluate example.
//!
//! Wires the extension over the baseline lifter, lifts a conditional select
//! increment, prints the IL, and executes it under both flag states with the
//! reference evaluator. This is useful for:
//!
//! - Inspecting the exact IL a translation produces
//! - Checking flag semantics without a full binary
//!
//! # Usage
//!
//! ```bash
//! cargo run --example lift_and_eval
//! ```

use a64lift::{Aarch64Base, Architecture, ArchitectureRegistry, BASE_ARCHITECTURE, plugin_init};
use a64lift_il::{Evaluator, Flags, LowLevelIlFunction, RegisterId, RegisterNames};

// csinc w0, w1, w2, eq
const CSINC: [u8; 4] = [0x20, 0x04, 0x82, 0x1A];

struct Names<'a> {
    arch: &'a dyn Architecture,
}

impl RegisterNames for Names<'_> {
    fn register_name(&self, reg: RegisterId) -> Option<&str> {
        self.arch.register_info(reg).map(|info| info.name)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut registry = ArchitectureRegistry::new();
    registry.register(Box::new(Aarch64Base::new()));
    plugin_init(&mut registry)?;
    let arch = registry
        .by_name(BASE_ARCHITECTURE)
        .ok_or("base architecture missing")?;

    let mut il = LowLevelIlFunction::new();
    let mut length = 0;
    if !arch.lift_instruction(&CSINC, 0x1000, &mut length, &mut il) {
        return Err("csinc was not lifted".into());
    }

    println!("csinc w0, w1, w2, eq lifts to:");
    let names = Names { arch };
    print!("{}", il.display_with(&names));

    let w0 = arch.register_by_name("w0").ok_or("unknown register")?;
    let w1 = arch.register_by_name("w1").ok_or("unknown register")?;
    let w2 = arch.register_by_name("w2").ok_or("unknown register")?;

    // With z set the select copies w1; with z clear it produces w2 + 1.
    for zero in [true, false] {
        let mut eval = Evaluator::new();
        eval.set_flags(Flags {
            zero,
            ..Flags::default()
        });
        eval.write_register(w1, 7);
        eval.write_register(w2, 41);
        eval.run(&il)?;
        println!("z={zero}: w0 = {:#x}", eval.register(w0));
    }

    Ok(())
}
