//! A-posteriori improvement of interval error bounds.
//!
//! Plain interval arithmetic compounds the declared errors of its inputs
//! at every step and routinely overshoots the error a result actually
//! carries. This crate recomputes the bound after the fact: it records the
//! elementary operations of a computation, replays them in reverse, and
//! charges each primary input's declared error exactly its first-order
//! sensitivity in the output. The improved radius is
//! `Σ errᵢ · |∂y/∂xᵢ|`, and the traditional forward bound is kept whenever
//! it happens to be tighter.
//!
//! Two engines produce the improved bound:
//!
//! * the **dynamic** engine ([`tape`], [`track`]) instruments arbitrary
//!   arithmetic: [`Tracked`] values record onto a caller-owned tape and
//!   [`TrackedResult`] resolves any of them as the output;
//! * the **statical** engine ([`statical`], [`linalg`]) knows the
//!   Gaussian-elimination schedule in advance and derives the adjoints in
//!   closed form, for determinants and linear solves.
//!
//! All arithmetic is midpoint-radius over dyadic multi-precision reals
//! ([`numeric`]), with directed rounding folded into the radii so the
//! enclosures stay sound at any working precision ([`precision`]).
//!
//! ```
//! use aposteriori::{new_tape, Interval, Tracked, TrackedResult};
//!
//! let tape = new_tape();
//! let x = Tracked::new(&tape, Interval::with_radius(1.0, 0.01));
//! let y = Tracked::new(&tape, Interval::with_radius(2.0, 0.03));
//! tape.borrow_mut().init()?;
//!
//! let z = &(&x * &y) + &x;
//! let resolved = TrackedResult::resolve(&z)?;
//! assert!(resolved.interval().error() <= z.value().error());
//! # Ok::<(), aposteriori::Error>(())
//! ```

pub mod error;
pub mod linalg;
pub mod numeric;
pub mod precision;
pub mod statical;
pub mod tape;
pub mod track;

pub use error::{Error, Result};
pub use linalg::{Entry, Matrix};
pub use numeric::{Interval, Real, Round};
pub use precision::{precision, set_precision};
pub use tape::{Addr, Checkpoint, Command, OpKind, Tape};
pub use track::{new_tape, TapeHandle, Tracked, TrackedResult};
