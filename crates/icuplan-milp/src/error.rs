//! Error types for model construction

use thiserror::Error;

use crate::variable::VarId;

/// Error raised while building or evaluating a [`Model`](crate::Model).
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// An expression references a variable that was never added.
    #[error("unknown variable {0:?}")]
    UnknownVariable(VarId),

    /// Variable bounds are empty, NaN, or have an infinite lower bound.
    #[error("invalid bounds [{lower}, {upper}] for variable `{name}`")]
    InvalidBounds { name: String, lower: f64, upper: f64 },

    /// A coefficient or right-hand side is not a finite number.
    #[error("non-finite coefficient in `{0}`")]
    NonFinite(String),

    /// An assignment does not cover exactly the model's variables.
    #[error("assignment has {found} values, model has {expected} variables")]
    AssignmentLength { expected: usize, found: usize },
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
