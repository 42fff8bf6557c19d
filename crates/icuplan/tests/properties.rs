//! Invariants every solved assignment must satisfy, checked on the raw
//! solver output rather than the extracted plan.

use icuplan::milp::Assignment;
use icuplan::{
    extract_plan, BranchAndBoundSolver, FixedDemand, Formulation, Planner, PlannerConfig,
    Problem, SolveOptions, SolveStatus, SolverAdapter,
};
use icuplan_test::{repair_mix, scenario_a, scenario_b, scenario_c, scenario_d, Scenario};

fn solved(scenario: &Scenario) -> (Problem, Formulation, Assignment, f64) {
    let planner = Planner::new(PlannerConfig::default());
    let problem = planner
        .build_problem(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap();
    let formulation = planner.formulate(&problem).unwrap();
    let outcome = BranchAndBoundSolver::new().solve(formulation.model(), &SolveOptions::new());
    assert_eq!(outcome.status, SolveStatus::Optimal);
    let objective = outcome.objective_value.unwrap();
    let assignment = outcome.assignment.unwrap();
    (problem, formulation, assignment, objective)
}

fn feasible_scenarios() -> Vec<Scenario> {
    vec![scenario_a(), scenario_b(), scenario_d(), repair_mix()]
}

#[test]
fn test_beds_meet_demand() {
    for scenario in feasible_scenarios() {
        let (problem, formulation, assignment, _) = solved(&scenario);
        let vars = formulation.variables();
        let beds: f64 = (0..problem.facility_count())
            .map(|f| assignment[vars.beds(f)])
            .sum();
        assert!(beds >= problem.demand());
    }
}

#[test]
fn test_operating_iff_beds() {
    for scenario in feasible_scenarios() {
        let (problem, formulation, assignment, _) = solved(&scenario);
        let vars = formulation.variables();
        for f in 0..problem.facility_count() {
            let operating = assignment[vars.operating(f)] == 1.0;
            let has_beds = assignment[vars.beds(f)] > 0.0;
            assert_eq!(operating, has_beds, "facility {}", problem.facility_id(f));
        }
    }
}

#[test]
fn test_repair_within_broken_units() {
    for scenario in feasible_scenarios() {
        let (problem, formulation, assignment, _) = solved(&scenario);
        let vars = formulation.variables();
        for f in 0..problem.facility_count() {
            for r in problem.repairable() {
                let repair = vars.repair(f, r).unwrap();
                assert!(assignment[repair] <= problem.needing_repair(f, r) as f64);
            }
        }
    }
}

#[test]
fn test_scenario_d_repairs_stay_zero() {
    let (problem, formulation, assignment, _) = solved(&scenario_d());
    let vars = formulation.variables();
    for f in 0..problem.facility_count() {
        for r in problem.repairable() {
            assert_eq!(assignment[vars.repair(f, r).unwrap()], 0.0);
        }
    }
}

#[test]
fn test_transfers_within_sender_stock() {
    for scenario in feasible_scenarios() {
        let (problem, formulation, assignment, _) = solved(&scenario);
        let vars = formulation.variables();
        for r in 0..problem.requirement_count() {
            for from in 0..problem.facility_count() {
                for to in 0..problem.facility_count() {
                    if let Some(transfer) = vars.transfer(r, from, to) {
                        assert!(assignment[transfer] <= problem.holding(from, r) as f64);
                    }
                }
            }
        }
    }
}

#[test]
fn test_built_facilities_operate() {
    for scenario in feasible_scenarios() {
        let (problem, formulation, assignment, _) = solved(&scenario);
        let vars = formulation.variables();
        for f in problem.built_facilities() {
            assert_eq!(assignment[vars.operating(f)], 1.0);
        }
    }
}

#[test]
fn test_assignments_pass_model_check() {
    for scenario in feasible_scenarios() {
        let (_, formulation, assignment, objective) = solved(&scenario);
        let model = formulation.model();
        assert!(model.check(&assignment, 1e-6).unwrap().is_empty());
        assert_eq!(model.objective_value(&assignment).unwrap(), objective);
    }
}

#[test]
fn test_extraction_is_idempotent() {
    for scenario in feasible_scenarios() {
        let (problem, formulation, assignment, objective) = solved(&scenario);
        let first = extract_plan(&problem, &formulation, &assignment, objective).unwrap();
        let second = extract_plan(&problem, &formulation, &assignment, objective).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_infeasible_model_has_no_assignment() {
    let scenario = scenario_c();
    let planner = Planner::new(PlannerConfig::default());
    let problem = planner
        .build_problem(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap();
    let formulation = planner.formulate(&problem).unwrap();

    let outcome = BranchAndBoundSolver::new().solve(formulation.model(), &SolveOptions::new());

    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(outcome.assignment.is_none());
    assert!(outcome.objective_value.is_none());
}
