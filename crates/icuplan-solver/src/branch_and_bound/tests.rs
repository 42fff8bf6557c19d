//! Tests for the branch-and-bound solver.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use icuplan_milp::{ConstraintOp, LinearExpr, ObjectiveSense, VarId, VarType};
use tokio::sync::mpsc::unbounded_channel;

use super::*;
use crate::heuristic::RoundUp;

fn knapsack() -> (Model, VarId, VarId) {
    let mut model = Model::new("knapsack");
    let x = model.add_variable("x", VarType::Integer, 0.0, f64::INFINITY).unwrap();
    let y = model.add_variable("y", VarType::Integer, 0.0, f64::INFINITY).unwrap();
    model
        .add_constraint("a", LinearExpr::new().term(x, 6.0).term(y, 4.0), ConstraintOp::Le, 24.0)
        .unwrap();
    model
        .add_constraint("b", LinearExpr::new().term(x, 1.0).term(y, 2.0), ConstraintOp::Le, 6.0)
        .unwrap();
    model
        .set_objective(ObjectiveSense::Maximize, LinearExpr::new().term(x, 5.0).term(y, 4.0))
        .unwrap();
    (model, x, y)
}

#[test]
fn test_integer_maximization() {
    let (model, x, y) = knapsack();
    let outcome = BranchAndBoundSolver::new().solve(&model, &SolveOptions::new());

    assert_eq!(outcome.status, SolveStatus::Optimal);
    let assignment = outcome.assignment.unwrap();
    assert_eq!(assignment[x], 4.0);
    assert_eq!(assignment[y], 0.0);
    assert!((outcome.objective_value.unwrap() - 20.0).abs() < 1e-6);
    assert!(outcome.statistics.nodes > 1);
    assert!(outcome.statistics.incumbents >= 1);
    assert!(model.check(&assignment, 1e-9).unwrap().is_empty());
}

#[test]
fn test_shifted_integer_bounds() {
    let mut model = Model::new("shift");
    let x = model.add_variable("x", VarType::Integer, 2.0, 5.0).unwrap();
    let y = model.add_variable("y", VarType::Integer, 0.0, 3.0).unwrap();
    model
        .add_constraint("sum", LinearExpr::new().term(x, 1.0).term(y, 1.0), ConstraintOp::Eq, 7.0)
        .unwrap();
    model
        .set_objective(ObjectiveSense::Minimize, LinearExpr::new().term(x, -1.0))
        .unwrap();

    let outcome = BranchAndBoundSolver::new().solve(&model, &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::Optimal);
    let assignment = outcome.assignment.unwrap();
    assert_eq!(assignment[x], 5.0);
    assert_eq!(assignment[y], 2.0);
}

#[test]
fn test_binary_branching() {
    // cover 7 with either a big unit (binary, cost 10) or small units (cost 3 each)
    let mut model = Model::new("binary");
    let big = model.add_variable("big", VarType::Binary, 0.0, 1.0).unwrap();
    let small = model.add_variable("small", VarType::Integer, 0.0, f64::INFINITY).unwrap();
    model
        .add_constraint(
            "cover",
            LinearExpr::new().term(big, 7.0).term(small, 2.0),
            ConstraintOp::Ge,
            7.0,
        )
        .unwrap();
    model
        .set_objective(
            ObjectiveSense::Minimize,
            LinearExpr::new().term(big, 10.0).term(small, 3.0),
        )
        .unwrap();

    let outcome = BranchAndBoundSolver::new().solve(&model, &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::Optimal);
    let assignment = outcome.assignment.unwrap();
    assert_eq!(assignment[big], 1.0);
    assert_eq!(assignment[small], 0.0);
    assert_eq!(outcome.objective_value, Some(10.0));
}

#[test]
fn test_infeasible_model() {
    let mut model = Model::new("infeasible");
    let x = model.add_variable("x", VarType::Integer, 0.0, 1.0).unwrap();
    let y = model.add_variable("y", VarType::Integer, 0.0, 1.0).unwrap();
    model
        .add_constraint("a", LinearExpr::new().term(x, 1.0).term(y, 1.0), ConstraintOp::Ge, 3.0)
        .unwrap();

    let outcome = BranchAndBoundSolver::new().solve(&model, &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(outcome.assignment.is_none());
    assert!(outcome.objective_value.is_none());
}

#[test]
fn test_integer_infeasible_after_branching() {
    // 2x = 3 has a relaxed solution but no integer one
    let mut model = Model::new("parity");
    let x = model.add_variable("x", VarType::Integer, 0.0, 10.0).unwrap();
    model
        .add_constraint("odd", LinearExpr::new().term(x, 2.0), ConstraintOp::Eq, 3.0)
        .unwrap();

    let outcome = BranchAndBoundSolver::new().solve(&model, &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert_eq!(outcome.statistics.nodes, 3);
}

#[test]
fn test_unbounded_reports_error() {
    let mut model = Model::new("unbounded");
    let x = model.add_variable("x", VarType::Integer, 0.0, f64::INFINITY).unwrap();
    model
        .set_objective(ObjectiveSense::Maximize, LinearExpr::from(x))
        .unwrap();

    let outcome = BranchAndBoundSolver::new().solve(&model, &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::Error);
    assert!(outcome.message.unwrap().contains("unbounded"));
}

#[test]
fn test_terminate_flag_before_start() {
    let (model, _, _) = knapsack();
    let flag = Arc::new(AtomicBool::new(true));
    let options = SolveOptions::new().with_terminate_flag(flag);

    let outcome = BranchAndBoundSolver::new().solve(&model, &options);
    assert_eq!(outcome.status, SolveStatus::TimedOut);
    assert!(outcome.assignment.is_none());
    assert_eq!(outcome.statistics.nodes, 0);
}

#[test]
fn test_zero_time_limit_times_out() {
    let (model, _, _) = knapsack();
    let options = SolveOptions::new().with_time_limit(Duration::ZERO);

    let outcome = BranchAndBoundSolver::new().solve(&model, &options);
    assert_eq!(outcome.status, SolveStatus::TimedOut);
}

#[test]
fn test_node_limit_stops_search() {
    let (model, _, _) = knapsack();
    // the root relaxation (3, 1.5) is fractional, so one node finds nothing
    let outcome = BranchAndBoundSolver::new()
        .with_node_limit(1)
        .solve(&model, &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::TimedOut);
    assert_eq!(outcome.statistics.nodes, 1);
}

#[test]
fn test_node_limit_reached_on_last_node() {
    let mut model = Model::new("integral_root");
    let x = model.add_variable("x", VarType::Integer, 0.0, 10.0).unwrap();
    model
        .add_constraint("cover", LinearExpr::from(x), ConstraintOp::Ge, 4.0)
        .unwrap();
    model
        .set_objective(ObjectiveSense::Minimize, LinearExpr::from(x))
        .unwrap();

    let outcome = BranchAndBoundSolver::new()
        .with_node_limit(1)
        .solve(&model, &SolveOptions::new());
    // the root is integral, so nothing is left open when the limit hits
    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.objective_value, Some(4.0));
}

#[test]
fn test_early_stop_keeps_incumbent() {
    // root x = 1.5; the down child x <= 1 is integral, the up child stays open
    let mut model = Model::new("half");
    let x = model.add_variable("x", VarType::Integer, 0.0, 10.0).unwrap();
    model
        .add_constraint("cap", LinearExpr::new().term(x, 2.0), ConstraintOp::Le, 3.0)
        .unwrap();
    model
        .set_objective(ObjectiveSense::Maximize, LinearExpr::from(x))
        .unwrap();

    let outcome = BranchAndBoundSolver::new()
        .with_node_limit(2)
        .solve(&model, &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::Feasible);
    assert_eq!(outcome.objective_value, Some(1.0));
    assert_eq!(outcome.assignment.unwrap()[x], 1.0);
}

#[test]
fn test_incumbents_are_streamed() {
    let (model, _, _) = knapsack();
    let (sender, mut receiver) = unbounded_channel();

    let outcome = BranchAndBoundSolver::new()
        .with_incumbent_sender(sender)
        .solve(&model, &SolveOptions::new());

    let mut received = Vec::new();
    while let Ok(incumbent) = receiver.try_recv() {
        assert!(model.check(&incumbent.assignment, 1e-9).unwrap().is_empty());
        received.push(incumbent);
    }
    assert_eq!(received.len() as u64, outcome.statistics.incumbents);
    // each published incumbent improves on the previous one
    for pair in received.windows(2) {
        assert!(pair[1].objective > pair[0].objective);
    }
    assert_eq!(
        received.last().map(|i| i.objective),
        outcome.objective_value
    );
}

#[test]
fn test_from_settings() {
    let settings = SolverSettings {
        node_limit: Some(7),
        absolute_gap: 0.5,
        ..SolverSettings::default()
    };
    let solver = BranchAndBoundSolver::from_settings(&settings);
    assert_eq!(solver.node_limit, Some(7));
    assert_eq!(solver.absolute_gap, 0.5);
    assert_eq!(solver.integrality_tolerance, 1e-6);
}

/// min 3x + 2y s.t. 2x + 2y >= 3: the relaxation is y = 1.5 with bound 3,
/// rounding up gives y = 2 at cost 4.
fn fractional_cover() -> (Model, VarId, VarId) {
    let mut model = Model::new("cover");
    let x = model.add_variable("x", VarType::Integer, 0.0, f64::INFINITY).unwrap();
    let y = model.add_variable("y", VarType::Integer, 0.0, f64::INFINITY).unwrap();
    model
        .add_constraint("cover", LinearExpr::new().term(x, 2.0).term(y, 2.0), ConstraintOp::Ge, 3.0)
        .unwrap();
    model
        .set_objective(ObjectiveSense::Minimize, LinearExpr::new().term(x, 3.0).term(y, 2.0))
        .unwrap();
    (model, x, y)
}

/// Solves the root relaxation and fails every other node.
fn fails_below_root(model: &Model, lower: &[f64], upper: &[f64]) -> crate::error::Result<LpSolution> {
    let at_root = model
        .variables()
        .iter()
        .zip(lower.iter().zip(upper))
        .all(|(v, (&l, &u))| v.lower() == l && v.upper() == u);
    if at_root {
        solve_relaxation_with_bounds(model, lower, upper)
    } else {
        Err(SolverError::IterationLimit(0))
    }
}

#[test]
fn test_heuristic_incumbent_before_branching() {
    let (model, x, y) = fractional_cover();
    let options = SolveOptions::new().with_heuristic(Arc::new(RoundUp));

    // one node: the relaxation is fractional, so only the heuristic can supply a plan
    let outcome = BranchAndBoundSolver::new()
        .with_node_limit(1)
        .solve(&model, &options);

    assert_eq!(outcome.status, SolveStatus::Feasible);
    assert_eq!(outcome.objective_value, Some(4.0));
    let assignment = outcome.assignment.unwrap();
    assert_eq!(assignment[x], 0.0);
    assert_eq!(assignment[y], 2.0);
    assert_eq!(outcome.statistics.incumbents, 1);
}

#[test]
fn test_heuristic_does_not_change_optimum() {
    let (model, _, _) = fractional_cover();
    let plain = BranchAndBoundSolver::new().solve(&model, &SolveOptions::new());
    let helped = BranchAndBoundSolver::new()
        .solve(&model, &SolveOptions::new().with_heuristic(Arc::new(RoundUp)));

    assert_eq!(plain.status, SolveStatus::Optimal);
    assert_eq!(helped.status, SolveStatus::Optimal);
    assert_eq!(plain.objective_value, helped.objective_value);
}

#[test]
fn test_failed_node_keeps_incumbent() {
    let (model, _, y) = fractional_cover();
    let options = SolveOptions::new().with_heuristic(Arc::new(RoundUp));

    let outcome = BranchAndBoundSolver::new()
        .with_relaxation(fails_below_root)
        .solve(&model, &options);

    assert_eq!(outcome.status, SolveStatus::Feasible);
    assert_eq!(outcome.objective_value, Some(4.0));
    assert_eq!(outcome.assignment.unwrap()[y], 2.0);
    assert_eq!(outcome.statistics.abandoned, 2);
    assert!(outcome.message.is_none());
}

#[test]
fn test_failed_node_without_incumbent_is_error() {
    let (model, _, _) = fractional_cover();

    let outcome = BranchAndBoundSolver::new()
        .with_relaxation(fails_below_root)
        .solve(&model, &SolveOptions::new());

    assert_eq!(outcome.status, SolveStatus::Error);
    assert!(outcome.assignment.is_none());
    assert!(outcome.message.unwrap().contains("pivots"));
}

#[test]
fn test_rounding_failure_branches_instead_of_dropping() {
    // x = 1.2 looks integral under a 0.3 tolerance, but x = 1 breaks 10x >= 12
    let mut model = Model::new("loose");
    let x = model.add_variable("x", VarType::Integer, 0.0, 10.0).unwrap();
    model
        .add_constraint("cover", LinearExpr::new().term(x, 10.0), ConstraintOp::Ge, 12.0)
        .unwrap();
    model
        .set_objective(ObjectiveSense::Minimize, LinearExpr::from(x))
        .unwrap();
    let settings = SolverSettings {
        integrality_tolerance: 0.3,
        ..SolverSettings::default()
    };

    let outcome = BranchAndBoundSolver::from_settings(&settings).solve(&model, &SolveOptions::new());

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.assignment.unwrap()[x], 2.0);
    assert_eq!(outcome.objective_value, Some(2.0));
    assert_eq!(outcome.statistics.nodes, 3);
}
