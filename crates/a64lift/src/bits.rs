//! Bit-mask helpers for bitfield lifting.

use std::ops::{Not, Shl};

/// Fixed-width unsigned integers usable as mask carriers.
pub trait MaskWord: Copy + Not<Output = Self> + Shl<u32, Output = Self> {
    /// Width in bits.
    const BITS: u32;
    /// The zero value.
    const ZERO: Self;
}

impl MaskWord for u8 {
    const BITS: u32 = 8;
    const ZERO: Self = 0;
}

impl MaskWord for u16 {
    const BITS: u32 = 16;
    const ZERO: Self = 0;
}

impl MaskWord for u32 {
    const BITS: u32 = 32;
    const ZERO: Self = 0;
}

impl MaskWord for u64 {
    const BITS: u32 = 64;
    const ZERO: Self = 0;
}

/// Returns ones expanded to `count`, e.g. `ones::<u8>(7) == 0b0111_1111`.
///
/// A `count` of the type's full bit width yields all ones without relying
/// on an out-of-range shift.
#[must_use]
pub fn ones<T: MaskWord>(count: u32) -> T {
    if count >= T::BITS {
        !T::ZERO
    } else {
        !(!T::ZERO << count)
    }
}
