//! Crate-wide error type.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The divisor interval may contain zero; the quotient has no
    /// meaningful midpoint-radius representation. Surfaced, never retried.
    #[error("division by an interval that may contain zero")]
    DivisorContainsZero,

    /// The tape (or a matrix routine) was used out of its required order.
    /// This signals a programming error in the caller, not a runtime
    /// condition to recover from.
    #[error("precondition violated: {0}")]
    Precondition(String),
}

impl Error {
    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Error::Precondition(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
