//! Multi-precision numeric types: dyadic reals and midpoint-radius
//! intervals. The rest of the crate treats these as opaque value types;
//! all rounding policy lives here.

pub mod interval;
pub mod real;

pub use interval::Interval;
pub use real::{Real, Round};
