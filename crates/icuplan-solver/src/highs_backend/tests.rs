//! Tests for the HiGHS adapter.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use icuplan_milp::{LinearExpr, VarType};

use super::*;
use crate::BranchAndBoundSolver;

fn knapsack() -> Model {
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
    model
}

#[test]
fn test_agrees_with_branch_and_bound() {
    let model = knapsack();
    let highs = HighsSolver::new().solve(&model, &SolveOptions::new());
    let reference = BranchAndBoundSolver::new().solve(&model, &SolveOptions::new());

    assert_eq!(highs.status, SolveStatus::Optimal);
    assert_eq!(reference.status, SolveStatus::Optimal);
    assert!((highs.objective_value.unwrap() - reference.objective_value.unwrap()).abs() < 1e-6);
    assert!(model.check(&highs.assignment.unwrap(), 1e-9).unwrap().is_empty());
}

#[test]
fn test_objective_constant_is_reported() {
    let mut model = Model::new("offset");
    let x = model.add_variable("x", VarType::Binary, 0.0, 1.0).unwrap();
    model
        .add_constraint("on", LinearExpr::from(x), ConstraintOp::Ge, 1.0)
        .unwrap();
    model
        .set_objective(ObjectiveSense::Minimize, LinearExpr::new().term(x, 3.0).constant(10.0))
        .unwrap();

    let outcome = HighsSolver::new().solve(&model, &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.objective_value, Some(13.0));
}

#[test]
fn test_infeasible_model() {
    let mut model = Model::new("infeasible");
    let x = model.add_variable("x", VarType::Integer, 0.0, 3.0).unwrap();
    model
        .add_constraint("too_many", LinearExpr::from(x), ConstraintOp::Ge, 5.0)
        .unwrap();
    model.set_objective(ObjectiveSense::Minimize, LinearExpr::from(x)).unwrap();

    let outcome = HighsSolver::new().solve(&model, &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(outcome.assignment.is_none());
}

#[test]
fn test_raised_flag_skips_solve() {
    let flag = Arc::new(AtomicBool::new(true));
    let options = SolveOptions::new().with_terminate_flag(flag);

    let outcome = HighsSolver::new().solve(&knapsack(), &options);
    assert_eq!(outcome.status, SolveStatus::TimedOut);
    assert!(outcome.assignment.is_none());
}
