//! Error types for icuplan

use icuplan_milp::ModelError;
use thiserror::Error;

use crate::domain::{FacilityId, RequirementRef};

/// Malformed or inconsistent input data.
///
/// Raised by the problem builder before any decision variable exists, so a
/// failed build never leaves a partial problem behind.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("duplicate facility id `{0}`")]
    DuplicateFacility(FacilityId),

    #[error("duplicate requirement `{0}`")]
    DuplicateRequirement(RequirementRef),

    #[error("facility `{facility}` holds unknown requirement `{requirement}`")]
    UnknownRequirement {
        facility: FacilityId,
        requirement: RequirementRef,
    },

    #[error("facility `{facility}` has negative {field} for `{requirement}`: {value}")]
    NegativeHolding {
        facility: FacilityId,
        requirement: RequirementRef,
        field: &'static str,
        value: i64,
    },

    #[error("demand must be non-negative, got {0}")]
    NegativeDemand(f64),

    #[error("demand must be a finite number, got {0}")]
    InvalidDemand(f64),

    #[error("no demand given and no demand source configured")]
    MissingDemand,

    #[error("demand source failed: {0}")]
    Demand(#[from] DemandError),

    #[error("necessary rate of `{requirement}` must be positive and finite, got {value}")]
    InvalidRate {
        requirement: RequirementRef,
        value: f64,
    },

    #[error("staff `{0}` declares a zero-hour shift")]
    ZeroShift(RequirementRef),

    #[error("{what} must be non-negative and finite, got {value}")]
    NegativeCost { what: String, value: f64 },

    #[error("facility `{facility}` has invalid bed bounds [{lower}, {upper}]")]
    InvalidBedBounds {
        facility: FacilityId,
        lower: u32,
        upper: u32,
    },

    #[error("transfer cost table has shape {found:?}, expected {expected:?} (requirements, facilities, facilities)")]
    TransferTableShape {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Failure reported by a [`DemandSource`](crate::DemandSource).
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct DemandError(pub String);

/// Error for one end-to-end planning request.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("catalog unavailable: {0}")]
    Catalog(String),

    #[error("formulation error: {0}")]
    Model(#[from] ModelError),

    /// The solver proved that no plan meets the demand.
    #[error("problem is infeasible")]
    Infeasible,

    /// The time budget ran out before any feasible plan was found.
    #[error("solver timed out without a feasible plan")]
    TimedOut,

    #[error("solver error: {0}")]
    Solver(String),

    /// The assignment contradicts the formulation; indicates a solver or
    /// formulation defect and aborts plan generation.
    #[error("solution inconsistency: {0}")]
    SolutionInconsistency(String),
}

/// Result type alias for icuplan operations
pub type Result<T> = std::result::Result<T, PlanningError>;
