//! The dynamic engine: a tape of interval slots plus reverse-step
//! commands, replayed backwards to attribute each primary input's error
//! its exact first-order sensitivity in the output.

pub mod command;
pub mod engine;

pub use command::{Addr, Command, OpKind};
pub use engine::{Checkpoint, Tape};
