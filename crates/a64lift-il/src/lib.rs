//! Low-level intermediate language for instruction lifting.
//!
//! This crate provides pure IL types with no AArch64-specific knowledge:
//! the expression arena and per-lift function builder, a small evaluator
//! for exercising lifted semantics, and text rendering. Lifting into this
//! IL is implemented in `a64lift`.

mod display;
mod eval;
mod expr;
mod flag;

pub use display::*;
pub use eval::*;
pub use expr::*;
pub use flag::*;
