//! Dense two-phase primal simplex for LP relaxations.
//!
//! Variables are shifted to `x = lower + y` with `y >= 0`; every finite
//! upper bound becomes an explicit row `y <= upper - lower`. Rows are
//! normalized to a non-negative right-hand side and columns are laid out as
//! structural, then slack/surplus, then artificial. The entering column is
//! the most negative reduced cost, with Bland's rule taking over during long
//! degenerate stretches so the method terminates on degenerate problems.

mod tableau;


use icuplan_milp::{ConstraintOp, Model};
use tracing::trace;

use crate::error::{Result, SolverError};
use tableau::Tableau;

const EPS: f64 = 1e-9;

/// Phase-one objective above this means the relaxation is infeasible.
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Pivot budget per relaxation.
const MAX_PIVOTS: u64 = 200_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
}

/// Result of one LP relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    pub status: LpStatus,
    /// One value per model variable; empty when infeasible.
    pub values: Vec<f64>,
    /// Objective in the model's own sense, constant included.
    pub objective: f64,
    pub pivots: u64,
}

impl LpSolution {
    fn infeasible(pivots: u64) -> Self {
        Self {
            status: LpStatus::Infeasible,
            values: Vec::new(),
            objective: f64::NAN,
            pivots,
        }
    }
}

/// Solves the continuous relaxation of `model` within its own bounds.
pub fn solve_relaxation(model: &Model) -> Result<LpSolution> {
    let lower: Vec<f64> = model.variables().iter().map(|v| v.lower()).collect();
    let upper: Vec<f64> = model.variables().iter().map(|v| v.upper()).collect();
    solve_relaxation_with_bounds(model, &lower, &upper)
}

/// Solves the continuous relaxation of `model` with the variable bounds
/// replaced by `lower` and `upper`. Lower bounds must be finite.
pub fn solve_relaxation_with_bounds(model: &Model, lower: &[f64], upper: &[f64]) -> Result<LpSolution> {
    let n = model.variable_count();
    for found in [lower.len(), upper.len()] {
        if found != n {
            return Err(SolverError::BoundsLength { expected: n, found });
        }
    }
    if lower.iter().any(|l| !l.is_finite()) {
        return Err(SolverError::Numerical("infinite lower bound".to_string()));
    }
    if lower.iter().zip(upper).any(|(l, u)| l > u) {
        return Ok(LpSolution::infeasible(0));
    }

    let rows = standard_rows(model, lower, upper);
    let mut tableau = Tableau::new(n, &rows);
    let width = tableau.width();
    let artificial_start = tableau.artificial_start();

    if artificial_start < width {
        let mut phase_one = vec![0.0; width];
        for cost in &mut phase_one[artificial_start..] {
            *cost = 1.0;
        }
        tableau.price(&phase_one);
        tableau.optimize(width, MAX_PIVOTS)?;

        let infeasibility = tableau.objective_value();
        if infeasibility > FEASIBILITY_TOLERANCE {
            trace!(event = "lp_infeasible", infeasibility, pivots = tableau.pivots());
            return Ok(LpSolution::infeasible(tableau.pivots()));
        }
        tableau.drive_out_artificials(artificial_start);
    }

    let sign = model.sense().min_sign();
    let mut phase_two = vec![0.0; width];
    for (var, coef) in model.objective().terms() {
        phase_two[var.index()] += sign * coef;
    }
    tableau.price(&phase_two);
    tableau.optimize(artificial_start, MAX_PIVOTS)?;

    let shifted = tableau.basic_values();
    let values: Vec<f64> = (0..n)
        .map(|j| (lower[j] + shifted[j]).clamp(lower[j], upper[j]))
        .collect();
    let objective = model.objective().evaluate_slice(&values);

    Ok(LpSolution {
        status: LpStatus::Optimal,
        values,
        objective,
        pivots: tableau.pivots(),
    })
}

/// A row `coefs . y  op  rhs` over the shifted variables with `rhs >= 0`.
pub(crate) struct StandardRow {
    pub coefs: Vec<f64>,
    pub op: ConstraintOp,
    pub rhs: f64,
}

fn standard_rows(model: &Model, lower: &[f64], upper: &[f64]) -> Vec<StandardRow> {
    let n = model.variable_count();
    let mut rows = Vec::with_capacity(model.constraint_count() + n);

    for constraint in model.constraints() {
        let mut coefs = vec![0.0; n];
        let mut rhs = constraint.rhs();
        for (var, coef) in constraint.expr().terms() {
            coefs[var.index()] += coef;
            rhs -= coef * lower[var.index()];
        }
        rows.push(normalized(coefs, constraint.op(), rhs));
    }

    for j in 0..n {
        if upper[j].is_finite() {
            let mut coefs = vec![0.0; n];
            coefs[j] = 1.0;
            rows.push(normalized(coefs, ConstraintOp::Le, (upper[j] - lower[j]).max(0.0)));
        }
    }

    rows
}

fn normalized(mut coefs: Vec<f64>, op: ConstraintOp, rhs: f64) -> StandardRow {
    if rhs < 0.0 {
        for c in &mut coefs {
            *c = -*c;
        }
        StandardRow {
            coefs,
            op: op.flipped(),
            rhs: -rhs,
        }
    } else {
        StandardRow { coefs, op, rhs }
    }
}
