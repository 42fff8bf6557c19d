//! The solver capability the planner depends on.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use icuplan_milp::{Assignment, Model};
use serde::Serialize;

use crate::heuristic::PrimalHeuristic;
use crate::statistics::SolverStatistics;

/// Solves a formulated model.
///
/// Implementations must honour the time limit and terminate flag in
/// [`SolveOptions`]: on early stop they return the best assignment found so
/// far as [`SolveStatus::Feasible`], or [`SolveStatus::TimedOut`] when there
/// is none.
pub trait SolverAdapter: Send + Sync {
    fn solve(&self, model: &Model, options: &SolveOptions) -> SolveOutcome;
}

/// Per-call limits and hints.
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    pub time_limit: Option<Duration>,
    /// Cooperative cancellation flag, checked between search nodes.
    pub terminate: Option<Arc<AtomicBool>>,
    /// Rounding heuristic for fractional relaxations. Backends with their
    /// own primal heuristics may ignore it.
    pub heuristic: Option<Arc<dyn PrimalHeuristic>>,
}

impl SolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate = Some(flag);
        self
    }

    pub fn with_heuristic(mut self, heuristic: Arc<dyn PrimalHeuristic>) -> Self {
        self.heuristic = Some(heuristic);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Search completed; the assignment is optimal within the gap.
    Optimal,
    /// Stopped early with an assignment that is feasible but not proven optimal.
    Feasible,
    Infeasible,
    /// Stopped early before any feasible assignment was found.
    TimedOut,
    Error,
}

impl SolveStatus {
    pub fn has_assignment(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::TimedOut => "timed_out",
            SolveStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// What a solve produced.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Present exactly when `assignment` is.
    pub objective_value: Option<f64>,
    pub assignment: Option<Assignment>,
    /// Set when `status` is [`SolveStatus::Error`].
    pub message: Option<String>,
    pub statistics: SolverStatistics,
}

impl SolveOutcome {
    pub fn with_solution(
        status: SolveStatus,
        objective_value: f64,
        assignment: Assignment,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            status,
            objective_value: Some(objective_value),
            assignment: Some(assignment),
            message: None,
            statistics,
        }
    }

    pub fn without_solution(status: SolveStatus, statistics: SolverStatistics) -> Self {
        Self {
            status,
            objective_value: None,
            assignment: None,
            message: None,
            statistics,
        }
    }

    pub fn error(message: impl Into<String>, statistics: SolverStatistics) -> Self {
        Self {
            status: SolveStatus::Error,
            objective_value: None,
            assignment: None,
            message: Some(message.into()),
            statistics,
        }
    }
}
