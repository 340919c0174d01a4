//! Process-wide working precision, in bits of mantissa.
//!
//! Every `Real` and `Interval` operation rounds its result to this width.
//! Set it once before any computation; changing it mid-computation is not
//! an error, but intervals produced under different widths mix poorly and
//! the improved bounds lose their comparability.

use std::sync::atomic::{AtomicU32, Ordering};

pub const DEFAULT_PRECISION: u32 = 256;

/// Below this the rounding code cannot represent a sign-carrying mantissa.
const MIN_PRECISION: u32 = 2;

static PRECISION: AtomicU32 = AtomicU32::new(DEFAULT_PRECISION);

/// Current working precision in bits.
#[inline(always)]
pub fn precision() -> u32 {
    PRECISION.load(Ordering::Relaxed)
}

/// Sets the working precision in bits. Clamped below at [`MIN_PRECISION`].
pub fn set_precision(bits: u32) {
    PRECISION.store(clamp(bits), Ordering::Relaxed);
}

#[inline]
fn clamp(bits: u32) -> u32 {
    bits.max(MIN_PRECISION)
}
