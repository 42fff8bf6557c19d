//! Error types for the reference solver.

use thiserror::Error;

/// Failure inside the solver itself.
///
/// The adapter reports all of these as [`SolveStatus::Error`](crate::SolveStatus::Error).
#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    #[error("simplex exceeded {0} pivots")]
    IterationLimit(u64),

    #[error("linear relaxation is unbounded")]
    Unbounded,

    #[error("expected {expected} variable bounds, got {found}")]
    BoundsLength { expected: usize, found: usize },

    #[error("numerical breakdown: {0}")]
    Numerical(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;
