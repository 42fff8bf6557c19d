//! icuplan MILP - model types for mixed-integer linear programs
//!
//! This crate provides the solver-independent pieces of a formulation:
//! - Variables with bounds and integrality
//! - Sparse linear expressions and constraints
//! - Assignments (one value per variable) and feasibility checking
//! - CPLEX LP text export for external MILP engines

pub mod assignment;
pub mod constraint;
pub mod error;
pub mod expr;
pub mod lp_format;
pub mod model;
pub mod variable;

pub use assignment::Assignment;
pub use constraint::{Constraint, ConstraintOp};
pub use error::ModelError;
pub use expr::LinearExpr;
pub use model::{Model, ObjectiveSense, Violation};
pub use variable::{VarId, VarType, Variable};
