//! Planner pipeline behavior around the solver boundary.

use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use icuplan::milp::{Assignment, Model};
use icuplan::{
    BranchAndBoundSolver, CatalogProvider, DataError, DemandError, FacilityId, FileCatalog,
    FixedDemand, NoForecast, Planner, PlannerConfig, PlanningError, SolveOptions, SolveOutcome,
    SolveStatus, SolverAdapter, SolverStatistics,
};
use icuplan_test::{scenario_a, scenario_b};

/// Returns a canned outcome regardless of the model.
struct CannedSolver(SolveOutcome);

impl SolverAdapter for CannedSolver {
    fn solve(&self, _model: &Model, _options: &SolveOptions) -> SolveOutcome {
        self.0.clone()
    }
}

/// Delegates to branch-and-bound but reports the result as non-optimal.
struct StoppedEarly;

impl SolverAdapter for StoppedEarly {
    fn solve(&self, model: &Model, options: &SolveOptions) -> SolveOutcome {
        let mut outcome = BranchAndBoundSolver::new().solve(model, options);
        outcome.status = SolveStatus::Feasible;
        outcome
    }
}

#[test]
fn test_solver_error_is_surfaced() {
    let scenario = scenario_a();
    let planner = Planner::new(PlannerConfig::default()).with_solver(CannedSolver(
        SolveOutcome::error("license expired", SolverStatistics::default()),
    ));

    let err = planner
        .plan(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap_err();

    assert!(matches!(err, PlanningError::Solver(ref msg) if msg == "license expired"));
}

#[test]
fn test_timed_out_without_plan() {
    let scenario = scenario_a();
    let planner = Planner::new(PlannerConfig::default()).with_solver(CannedSolver(
        SolveOutcome::without_solution(SolveStatus::TimedOut, SolverStatistics::default()),
    ));

    let err = planner
        .plan(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap_err();

    assert!(matches!(err, PlanningError::TimedOut));
}

#[test]
fn test_feasible_plan_marked_non_optimal() {
    let scenario = scenario_b();
    let planner = Planner::new(PlannerConfig::default()).with_solver(StoppedEarly);

    let report = planner
        .plan(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap();

    assert_eq!(report.status, SolveStatus::Feasible);
    assert!(!report.optimal);
    assert_eq!(report.plan.objective_value, 40.0);
}

#[test]
fn test_inconsistent_assignment_aborts() {
    let scenario = scenario_a();
    let planner = Planner::new(PlannerConfig::default());
    let problem = planner
        .build_problem(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap();
    let formulation = planner.formulate(&problem).unwrap();
    let vars = formulation.variables();

    // five beds at a facility that does not operate
    let mut assignment = Assignment::zeros(formulation.model().variable_count());
    assignment.set(vars.beds(0), 5.0);
    let bogus = SolveOutcome::with_solution(
        SolveStatus::Optimal,
        0.0,
        assignment,
        SolverStatistics::default(),
    );

    let err = Planner::new(PlannerConfig::default())
        .with_solver(CannedSolver(bogus))
        .solve(&problem)
        .unwrap_err();

    assert!(matches!(err, PlanningError::SolutionInconsistency(_)));
}

#[test]
fn test_missing_objective_is_recomputed() {
    let scenario = scenario_b();
    let planner = Planner::new(PlannerConfig::default());
    let problem = planner
        .build_problem(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap();
    let formulation = planner.formulate(&problem).unwrap();

    let mut outcome = BranchAndBoundSolver::new().solve(formulation.model(), &SolveOptions::new());
    outcome.objective_value = None;

    let report = Planner::new(PlannerConfig::default())
        .with_solver(CannedSolver(outcome))
        .solve(&problem)
        .unwrap();

    assert_eq!(report.plan.objective_value, 40.0);
}

#[test]
fn test_cancelled_before_search() {
    let scenario = scenario_b();
    let flag = Arc::new(AtomicBool::new(true));
    let planner = Planner::new(PlannerConfig::default()).with_terminate_flag(flag);

    let err = planner
        .plan(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap_err();

    assert!(matches!(err, PlanningError::TimedOut));
}

#[test]
fn test_no_forecast_needs_configured_demand() {
    let scenario = scenario_a();

    let err = Planner::new(PlannerConfig::default())
        .plan(&scenario.catalog, &NoForecast)
        .unwrap_err();
    assert!(matches!(err, PlanningError::Data(DataError::Demand(_))));

    let report = Planner::new(PlannerConfig::default().with_demand(5.0))
        .plan(&scenario.catalog, &NoForecast)
        .unwrap();
    assert_eq!(report.plan.summary.beds_total, 5);
}

#[test]
fn test_closure_demand_source_sees_horizon() {
    let scenario = scenario_a();
    let forecast = |horizon: u32| Ok::<_, DemandError>(f64::from(horizon) + 4.0);

    let report = Planner::new(PlannerConfig::default().with_horizon(1))
        .plan(&scenario.catalog, &forecast)
        .unwrap();

    assert_eq!(report.plan.summary.beds_total, 5);
}

#[test]
fn test_data_error_before_solving() {
    let mut scenario = scenario_a();
    scenario.catalog.equipment[0].necessary_rate = 0.0;

    let err = Planner::new(PlannerConfig::default())
        .plan(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap_err();

    assert!(matches!(err, PlanningError::Data(DataError::InvalidRate { .. })));
}

#[test]
fn test_incumbents_stream_while_planning() {
    let scenario = scenario_b();
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let solver = BranchAndBoundSolver::new().with_incumbent_sender(sender);

    let report = Planner::new(PlannerConfig::default())
        .with_solver(solver)
        .plan(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap();

    let mut last = None;
    while let Ok(incumbent) = receiver.try_recv() {
        last = Some(incumbent.objective);
    }
    assert_eq!(last, Some(report.plan.objective_value));
}

#[test]
fn test_plan_from_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("costs.txt"), "0 10 10\n10 0 10\n10 10 0\n").unwrap();
    let path = dir.path().join("network.yaml");
    fs::write(
        &path,
        r#"
transfer_costs_file: costs.txt
facilities:
  - id: north
    built: true
    upper_beds: 10
    holdings:
      equipment:
        ventilator: { working: 10 }
  - id: south
    built: true
    lower_beds: 4
    upper_beds: 10
  - id: field
    upper_beds: 10
    construction_cost: 1000.0
equipment:
  - id: ventilator
    unit_price: 5000.0
    necessary_rate: 1.0
"#,
    )
    .unwrap();

    let provider = FileCatalog::new(&path);
    assert_eq!(provider.catalog().unwrap().facilities.len(), 3);

    let report = Planner::new(PlannerConfig::default().with_demand(8.0))
        .plan(&provider, &NoForecast)
        .unwrap();

    assert_eq!(report.plan.objective_value, 40.0);
    let south = report.plan.facility(&FacilityId::new("south")).unwrap();
    assert_eq!(south.transfer_in[0].quantity, 4);
}

#[test]
fn test_report_serializes() {
    let scenario = scenario_a();
    let report = Planner::new(PlannerConfig::default())
        .plan(&scenario.catalog, &FixedDemand(scenario.demand))
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "optimal");
    assert_eq!(json["optimal"], true);
    assert_eq!(json["plan"]["facilities"][0]["facility"], "central");
    assert!(json["statistics"]["nodes"].as_u64().unwrap() >= 1);
}
