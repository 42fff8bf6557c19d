//! Primal heuristics that turn a fractional relaxation into an integer
//! candidate.

use std::fmt::Debug;

use icuplan_milp::{Assignment, Model};

/// Proposes an integer assignment from the values of an LP relaxation.
///
/// The solver checks every proposal against the model before accepting it
/// as an incumbent, so a heuristic may return an infeasible candidate; it
/// simply will not be used.
pub trait PrimalHeuristic: Debug + Send + Sync {
    fn propose(&self, model: &Model, relaxation: &[f64]) -> Option<Assignment>;
}

/// Rounds every integer variable up and keeps continuous values.
///
/// Suits covering models where every row is `>=` with non-negative
/// coefficients on the rounded columns; anything else is left to the check.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundUp;

impl PrimalHeuristic for RoundUp {
    fn propose(&self, model: &Model, relaxation: &[f64]) -> Option<Assignment> {
        if relaxation.len() != model.variable_count() {
            return None;
        }
        let values = model
            .variables()
            .iter()
            .zip(relaxation)
            .map(|(variable, &value)| {
                if variable.is_integral() {
                    (value - 1e-9).ceil().clamp(variable.lower(), variable.upper())
                } else {
                    value
                }
            })
            .collect();
        Some(Assignment::new(values))
    }
}
