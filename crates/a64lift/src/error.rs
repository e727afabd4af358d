use thiserror::Error;

/// Extension errors.
///
/// Per-instruction translation declines are not errors; translators signal
/// them with a `false` return and the dispatcher falls back to the base
/// lifter. This enum covers startup failures and the CLI surface.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to create AArch64 disassembler engine: {0}")]
    EngineInit(String),
    #[error("architecture {0:?} is not registered")]
    MissingArchitecture(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid machine code hex: {0}")]
    InvalidHex(String),
    #[error("no machine code in the selected input")]
    EmptyInput,
    #[error("no instruction decoded at offset {0:#x}")]
    Undecodable(usize),
    #[error("evaluation failed: {0}")]
    Eval(#[from] a64lift_il::EvalError),
}

pub type Result<T> = std::result::Result<T, Error>;
