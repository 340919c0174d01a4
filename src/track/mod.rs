//! Instrumented arithmetic: tracked values recording onto a shared tape,
//! and output sinks that resolve them to improved bounds.

pub mod proxy;
pub mod result;

pub use proxy::{new_tape, TapeHandle, Tracked};
pub use result::TrackedResult;
