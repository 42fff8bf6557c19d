//! [`SolverAdapter`] backed by the HiGHS MILP solver.
//!
//! Available with the `highs` feature. HiGHS runs its own presolve, cuts
//! and primal heuristics, so a [`PrimalHeuristic`](crate::PrimalHeuristic)
//! in [`SolveOptions`] is ignored. The terminate flag is only consulted
//! before the solve starts.

#[cfg(test)]
mod tests;

use std::sync::atomic::Ordering;
use std::time::Instant;

use ::highs::{HighsModelStatus, RowProblem, Sense};
use icuplan_config::SolverSettings;
use icuplan_milp::{Assignment, ConstraintOp, Model, ObjectiveSense};
use tracing::{debug, info, warn};

use crate::adapter::{SolveOptions, SolveOutcome, SolveStatus, SolverAdapter};
use crate::statistics::SolverStatistics;

/// Tolerance of the check applied to the assignment HiGHS returns.
const CHECK_TOLERANCE: f64 = 1e-6;

/// Solves models with HiGHS.
///
/// # Example
///
/// ```
/// use icuplan_milp::{ConstraintOp, LinearExpr, Model, ObjectiveSense, VarType};
/// use icuplan_solver::{HighsSolver, SolveOptions, SolveStatus, SolverAdapter};
///
/// let mut model = Model::new("tiny");
/// let x = model.add_variable("x", VarType::Integer, 0.0, f64::INFINITY).unwrap();
/// model.add_constraint("cover", LinearExpr::new().term(x, 2.0), ConstraintOp::Ge, 3.0).unwrap();
/// model.set_objective(ObjectiveSense::Minimize, LinearExpr::from(x)).unwrap();
///
/// let outcome = HighsSolver::new().solve(&model, &SolveOptions::new());
/// assert_eq!(outcome.status, SolveStatus::Optimal);
/// assert_eq!(outcome.assignment.unwrap()[x], 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct HighsSolver {
    absolute_gap: f64,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self::from_settings(&SolverSettings::default())
    }

    /// Takes the absolute gap from configuration. Node limits are specific
    /// to the reference solver and do not apply here.
    pub fn from_settings(settings: &SolverSettings) -> Self {
        Self {
            absolute_gap: settings.absolute_gap,
        }
    }

    fn run(&self, model: &Model, options: &SolveOptions) -> Result<Solved, String> {
        let mut problem = RowProblem::default();
        let objective: Vec<f64> = {
            let mut costs = vec![0.0; model.variable_count()];
            for (var, coef) in model.objective().terms() {
                costs[var.index()] += coef;
            }
            costs
        };

        let columns: Vec<_> = model
            .variables()
            .iter()
            .zip(&objective)
            .map(|(variable, &cost)| {
                problem.add_column_with_integrality(
                    cost,
                    variable.lower()..=variable.upper(),
                    variable.is_integral(),
                )
            })
            .collect();

        for constraint in model.constraints() {
            let factors: Vec<_> = constraint
                .expr()
                .terms()
                .map(|(var, coef)| (columns[var.index()], coef))
                .collect();
            let rhs = constraint.rhs();
            match constraint.op() {
                ConstraintOp::Le => {
                    problem.add_row(..=rhs, &factors);
                }
                ConstraintOp::Ge => {
                    problem.add_row(rhs.., &factors);
                }
                ConstraintOp::Eq => {
                    problem.add_row(rhs..=rhs, &factors);
                }
            }
        }

        let sense = match model.sense() {
            ObjectiveSense::Minimize => Sense::Minimise,
            ObjectiveSense::Maximize => Sense::Maximise,
        };
        let mut highs = problem.optimise(sense);
        highs.set_option("output_flag", false);
        highs.set_option("mip_abs_gap", self.absolute_gap);
        if let Some(limit) = options.time_limit {
            highs.set_option("time_limit", limit.as_secs_f64());
        }

        let solved = highs
            .try_solve()
            .map_err(|status| format!("HiGHS failed to run: {status:?}"))?;
        let status = solved.status();
        debug!(event = "highs_status", status = ?status);

        let has_solution = match status {
            HighsModelStatus::Optimal => true,
            HighsModelStatus::ReachedTimeLimit
            | HighsModelStatus::ReachedIterationLimit
            | HighsModelStatus::ObjectiveBound
            | HighsModelStatus::ObjectiveTarget => false,
            HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
                return Ok(Solved::Empty(SolveStatus::Infeasible));
            }
            other => return Err(format!("HiGHS stopped with status {other:?}")),
        };

        let assignment = rounded(model, solved.get_solution().columns());
        let violations = model
            .check(&assignment, CHECK_TOLERANCE)
            .map_err(|e| e.to_string())?;
        if !violations.is_empty() {
            if has_solution {
                return Err(format!(
                    "HiGHS solution violates {} model conditions",
                    violations.len()
                ));
            }
            // stopped before any feasible point
            return Ok(Solved::Empty(SolveStatus::TimedOut));
        }

        let status = if has_solution {
            SolveStatus::Optimal
        } else {
            SolveStatus::Feasible
        };
        Ok(Solved::Solution(status, assignment))
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

enum Solved {
    Solution(SolveStatus, Assignment),
    Empty(SolveStatus),
}

/// Snaps integer columns to the nearest integer.
fn rounded(model: &Model, columns: &[f64]) -> Assignment {
    let values = model
        .variables()
        .iter()
        .zip(columns)
        .map(|(variable, &value)| {
            if variable.is_integral() {
                value.round()
            } else {
                value
            }
        })
        .collect();
    Assignment::new(values)
}

impl SolverAdapter for HighsSolver {
    fn solve(&self, model: &Model, options: &SolveOptions) -> SolveOutcome {
        let started = Instant::now();
        info!(
            event = "solve_start",
            variables = model.variable_count(),
            integer_variables = model.integer_variable_count(),
            constraints = model.constraint_count(),
            time_limit_secs = options.time_limit.map(|t| t.as_secs_f64()),
        );

        let cancelled = options
            .terminate
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst));
        let result = if cancelled {
            Ok(Solved::Empty(SolveStatus::TimedOut))
        } else {
            self.run(model, options)
        };

        let statistics = SolverStatistics {
            elapsed: started.elapsed(),
            ..SolverStatistics::default()
        };
        let outcome = match result {
            Ok(Solved::Solution(status, assignment)) => {
                match model.objective_value(&assignment) {
                    Ok(objective) => {
                        SolveOutcome::with_solution(status, objective, assignment, statistics)
                    }
                    Err(e) => SolveOutcome::error(e.to_string(), statistics),
                }
            }
            Ok(Solved::Empty(status)) => SolveOutcome::without_solution(status, statistics),
            Err(message) => {
                warn!(event = "highs_failed", error = %message);
                SolveOutcome::error(message, statistics)
            }
        };

        info!(
            event = "solve_end",
            status = %outcome.status,
            objective = outcome.objective_value,
            nodes = outcome.statistics.nodes,
            pivots = outcome.statistics.pivots,
            incumbents = outcome.statistics.incumbents,
            duration_ms = started.elapsed().as_millis() as u64,
        );
        outcome
    }
}
