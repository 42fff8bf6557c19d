//! icuplan Solver - solver adapter and reference MILP solver
//!
//! This crate provides:
//! - [`SolverAdapter`], the capability the planner calls to solve a model
//! - [`BranchAndBoundSolver`], a depth-first branch-and-bound over a dense
//!   two-phase simplex, meant for small and medium instances and tests
//! - [`HighsSolver`], an adapter over the HiGHS MILP solver (feature `highs`)
//! - Terminations (time, node count, external flag) and statistics

pub mod adapter;
pub mod branch_and_bound;
pub mod error;
pub mod heuristic;
#[cfg(feature = "highs")]
pub mod highs_backend;
pub mod scope;
pub mod simplex;
pub mod statistics;
pub mod termination;

pub use adapter::{SolveOptions, SolveOutcome, SolveStatus, SolverAdapter};
pub use branch_and_bound::{BranchAndBoundSolver, Incumbent};
pub use error::SolverError;
pub use heuristic::{PrimalHeuristic, RoundUp};
#[cfg(feature = "highs")]
pub use highs_backend::HighsSolver;
pub use scope::SearchScope;
pub use simplex::{solve_relaxation, solve_relaxation_with_bounds, LpSolution, LpStatus};
pub use statistics::{SolverStatistics, StatisticsCollector};
pub use termination::{
    ExternalTermination, NodeCountTermination, OrTermination, Termination, TimeTermination,
};
