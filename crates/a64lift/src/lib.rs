//! AArch64 architecture extension.
//!
//! Lifts `csinc`, `cinc`, `umull`, `bfi` and `ror` to precise low-level IL
//! and defers every other instruction to the wrapped base architecture.

mod arch;
mod bits;
mod condition;
mod decode;
mod error;
mod extension;
mod plugin;
mod registers;

pub use arch::*;
pub use bits::*;
pub use condition::*;
pub use decode::*;
pub use error::*;
pub use extension::*;
pub use plugin::*;
pub use registers::*;
