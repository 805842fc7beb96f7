//! # Error Types
//!
//! Every public operation reports failure through [`LuneError`]. Errors
//! are deterministic functions of the input: the same arguments always
//! fail the same way, and nothing is retried.

use thiserror::Error;

/// Errors raised by the lunar phase library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LuneError {
    /// Input could not be interpreted (unparseable date text, unknown
    /// phase name, solver parameters outside their domain).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A numeric time value that is not finite or that no instant can
    /// represent.
    #[error("time value out of range: {0}")]
    OutOfRange(f64),

    /// A bounded iteration ran out of budget. This points at a defect in
    /// the model constants, not at bad input.
    #[error("{what} did not converge after {iterations} iterations")]
    NonConvergence {
        what: &'static str,
        iterations: usize,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LuneError>;
