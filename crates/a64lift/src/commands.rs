//! Command implementations.

use std::fs;
use std::path::PathBuf;

use a64lift::{
    Aarch64Base, Architecture, ArchitectureRegistry, BASE_ARCHITECTURE, DecodedInstruction,
    Disassembler, Error, Result, plugin_init,
};
use a64lift_il::{Evaluator, LowLevelIlFunction, RegisterId, RegisterNames};
use tracing::error;

use crate::cli::{Cli, Commands, EXIT_FAILURE, EXIT_SUCCESS, parse_hex_bytes};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Lift { .. } => handle_lift(cli),
        Commands::Disasm { .. } => handle_disasm(cli),
    }
}

fn handle_lift(cli: &Cli) -> i32 {
    let Commands::Lift {
        bytes,
        input,
        offset,
        limit,
        address,
        eval,
    } = &cli.command
    else {
        unreachable!("lift command variant mismatch");
    };
    let source = Source {
        bytes: bytes.as_deref(),
        input: input.as_ref(),
        offset: *offset,
        limit: *limit,
    };
    cmd_lift(&source, *address, *eval)
}

fn handle_disasm(cli: &Cli) -> i32 {
    let Commands::Disasm {
        bytes,
        input,
        offset,
        limit,
        address,
    } = &cli.command
    else {
        unreachable!("disasm command variant mismatch");
    };
    let source = Source {
        bytes: bytes.as_deref(),
        input: input.as_ref(),
        offset: *offset,
        limit: *limit,
    };
    cmd_disasm(&source, *address)
}

/// Handle the `lift` command.
fn cmd_lift(source: &Source<'_>, address: u64, eval: bool) -> i32 {
    let code = match read_code(source) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "failed to read machine code");
            return EXIT_FAILURE;
        }
    };
    match lift_listing(&code, address, eval) {
        Ok(listing) => {
            print!("{listing}");
            EXIT_SUCCESS
        }
        Err(e) => {
            error!(error = %e, "lift failed");
            EXIT_FAILURE
        }
    }
}

/// Handle the `disasm` command.
fn cmd_disasm(source: &Source<'_>, address: u64) -> i32 {
    let code = match read_code(source) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "failed to read machine code");
            return EXIT_FAILURE;
        }
    };
    match disasm_listing(&code, address) {
        Ok(listing) => {
            print!("{listing}");
            EXIT_SUCCESS
        }
        Err(e) => {
            error!(error = %e, "disassembly failed");
            EXIT_FAILURE
        }
    }
}

// ============================================================================
// Listing construction
// ============================================================================

/// Register names for IL rendering, answered by the lifting architecture.
struct ArchNames<'a> {
    arch: &'a dyn Architecture,
}

impl RegisterNames for ArchNames<'_> {
    fn register_name(&self, reg: RegisterId) -> Option<&str> {
        self.arch.register_info(reg).map(|info| info.name)
    }
}

/// Machine-code input selection shared by the subcommands.
struct Source<'a> {
    bytes: Option<&'a str>,
    input: Option<&'a PathBuf>,
    offset: Option<u64>,
    limit: Option<usize>,
}

fn read_code(source: &Source<'_>) -> Result<Vec<u8>> {
    let mut code = if let Some(text) = source.bytes {
        parse_hex_bytes(text).map_err(Error::InvalidHex)?
    } else if let Some(path) = source.input {
        fs::read(path)?
    } else {
        unreachable!("argument parsing enforces one input source");
    };
    if let Some(start) = source.offset {
        let start = usize::try_from(start).unwrap_or(usize::MAX).min(code.len());
        code.drain(..start);
    }
    if let Some(limit) = source.limit {
        code.truncate(limit);
    }
    if code.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(code)
}

fn instruction_text(instr: &DecodedInstruction) -> String {
    if instr.op_str.is_empty() {
        instr.mnemonic.clone()
    } else {
        format!("{} {}", instr.mnemonic, instr.op_str)
    }
}

/// Lift `code` through the registered extension and render a listing.
///
/// All instructions share one IL function, so instruction indices and label
/// targets are global to the listing.
fn lift_listing(code: &[u8], address: u64, eval: bool) -> Result<String> {
    let mut registry = ArchitectureRegistry::new();
    registry.register(Box::new(Aarch64Base::new()));
    plugin_init(&mut registry)?;
    let arch = registry
        .by_name(BASE_ARCHITECTURE)
        .ok_or(Error::MissingArchitecture(BASE_ARCHITECTURE))?;

    let mut il = LowLevelIlFunction::new();
    let mut headers = Vec::new();
    let mut offset = 0usize;
    let mut current = address;
    while offset < code.len() {
        let slice = &code[offset..];
        let Some(instr) =
            Disassembler::with(|engine| engine.and_then(|engine| engine.decode(slice, current)))
        else {
            return Err(Error::Undecodable(offset));
        };
        let start = il.len();
        let mut length = 0usize;
        if !arch.lift_instruction(slice, current, &mut length, &mut il) || length == 0 {
            return Err(Error::Undecodable(offset));
        }
        headers.push((current, instruction_text(&instr), start));
        offset += length;
        current = current.wrapping_add(length as u64);
    }

    let names = ArchNames { arch };
    let rendered = il.display_with(&names).to_string();
    let il_lines: Vec<&str> = rendered.lines().collect();

    let mut out = String::new();
    for (i, (addr, text, start)) in headers.iter().enumerate() {
        let end = headers.get(i + 1).map_or(il.len(), |next| next.2);
        out.push_str(&format!("{addr:#x}  {text}\n"));
        for line in &il_lines[*start..end] {
            out.push_str(line);
            out.push('\n');
        }
    }

    if eval {
        let mut evaluator = Evaluator::new();
        evaluator.run(&il)?;
        out.push_str("\nregisters:\n");
        for (reg, value) in evaluator.written_registers() {
            match arch.register_info(reg) {
                Some(info) => out.push_str(&format!("  {} = {value:#x}\n", info.name)),
                None => out.push_str(&format!("  r{} = {value:#x}\n", reg.0)),
            }
        }
    }

    Ok(out)
}

/// Decode `code` and render one line per instruction.
fn disasm_listing(code: &[u8], address: u64) -> Result<String> {
    Disassembler::check()?;
    let mut out = String::new();
    let mut offset = 0usize;
    let mut current = address;
    while offset < code.len() {
        let slice = &code[offset..];
        let Some(instr) =
            Disassembler::with(|engine| engine.and_then(|engine| engine.decode(slice, current)))
        else {
            return Err(Error::Undecodable(offset));
        };
        let bytes = slice[..instr.size]
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            "{current:#010x}  {bytes}  {}\n",
            instruction_text(&instr)
        ));
        offset += instr.size;
        current = current.wrapping_add(instr.size as u64);
    }
    Ok(out)
}
