//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "a64lift")]
#[command(about = "AArch64 extension lifter - lifts machine code to low-level IL")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lift machine code to low-level IL
    Lift {
        /// Instruction bytes as hex (e.g. "20 04 82 1a" or "2004821a")
        #[arg(value_name = "HEX", required_unless_present = "input", conflicts_with = "input")]
        bytes: Option<String>,

        /// Read raw machine code from a file instead
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Byte offset into the input file
        #[arg(long, requires = "input", value_parser = parse_address)]
        offset: Option<u64>,

        /// Lift at most this many bytes
        #[arg(long, requires = "input")]
        limit: Option<usize>,

        /// Base address of the code
        #[arg(short, long, default_value = "0", value_parser = parse_address)]
        address: u64,

        /// Evaluate the lifted IL and print the final register state
        #[arg(long)]
        eval: bool,
    },
    /// Disassemble machine code without lifting
    Disasm {
        /// Instruction bytes as hex
        #[arg(value_name = "HEX", required_unless_present = "input", conflicts_with = "input")]
        bytes: Option<String>,

        /// Read raw machine code from a file instead
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Byte offset into the input file
        #[arg(long, requires = "input", value_parser = parse_address)]
        offset: Option<u64>,

        /// Disassemble at most this many bytes
        #[arg(long, requires = "input")]
        limit: Option<usize>,

        /// Base address of the code
        #[arg(short, long, default_value = "0", value_parser = parse_address)]
        address: u64,
    },
}

// ============================================================================
// Argument parsing helpers
// ============================================================================

/// Parse an address, decimal or hex with 0x prefix.
pub fn parse_address(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| format!("invalid hex address: {e}"))
    } else {
        s.parse().map_err(|e| format!("invalid address: {e}"))
    }
}

/// Parse machine code from a hex string; whitespace between digits is fine.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, String> {
    let cleaned: String = s.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        return Err("hex string must have an even number of digits".to_string());
    }
    (0..cleaned.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&cleaned[i..i + 2], 16)
                .map_err(|e| format!("invalid hex byte at offset {i}: {e}"))
        })
        .collect()
}
