//! Tests for plan extraction.

use icuplan_milp::Assignment;

use super::*;
use crate::domain::{EquipmentRecord, FacilityRecord, RequirementRef};
use crate::error::PlanningError;
use crate::formulation::{Formulation, FormulationOptions};
use crate::problem::{Problem, ProblemBuilder};
use crate::test_utils::{catalog, small_network};

fn formulate(problem: &Problem) -> Formulation {
    Formulation::new(problem, FormulationOptions::default()).unwrap()
}

#[test]
fn test_single_facility_without_prior_beds() {
    let catalog = catalog(
        vec![FacilityRecord::new("h1", true, 0, 10)],
        vec![],
        vec![],
        vec![],
        0.0,
    );
    let problem = ProblemBuilder::new(&catalog).demand(5.0).build().unwrap();
    let formulation = formulate(&problem);
    let vars = formulation.variables();

    let mut assignment = Assignment::zeros(formulation.model().variable_count());
    assignment.set(vars.beds(0), 5.0);
    assignment.set(vars.operating(0), 1.0);

    let plan = extract_plan(&problem, &formulation, &assignment, 0.0).unwrap();
    assert_eq!(plan.facilities.len(), 1);
    let actions = &plan.facilities[0];
    assert_eq!(actions.beds, 5);
    assert_eq!(actions.added_beds, 5);
    assert!(!actions.newly_built);
    assert!(actions.acquire.is_empty());
    assert!(actions.repair.is_empty());
    assert_eq!(plan.summary.added_beds_total, 5);
}

fn network_assignment(formulation: &Formulation) -> Assignment {
    let vars = formulation.variables();
    let mut assignment = Assignment::zeros(formulation.model().variable_count());
    // h1: 8 beds, repairs 2 vents, ships 1 vent to h2 and receives nothing
    assignment.set(vars.beds(0), 8.0);
    assignment.set(vars.operating(0), 1.0);
    assignment.set(vars.repair(0, 0).unwrap(), 2.0);
    assignment.set(vars.acquire(0, 0), 1.0);
    assignment.set(vars.transfer(0, 0, 1).unwrap(), 1.0);
    // h2: 2 beds with the shipped vent
    assignment.set(vars.beds(1), 2.0);
    assignment.set(vars.operating(1), 1.0);
    assignment.set(vars.acquire(1, 2), 8.0);
    // solver noise on a zero variable
    assignment.set(vars.acquire(1, 1), 1e-9);
    assignment
}

#[test]
fn test_sparse_actions_with_counterparts() {
    let problem = ProblemBuilder::new(&small_network())
        .demand(10.0)
        .build()
        .unwrap();
    let formulation = formulate(&problem);
    let assignment = network_assignment(&formulation);

    let plan = extract_plan(&problem, &formulation, &assignment, 123.0).unwrap();
    assert_eq!(plan.objective_value, 123.0);
    assert_eq!(plan.facilities.len(), 2);
    assert!(plan.facility(&"site".into()).is_none());

    let h1 = plan.facility(&"h1".into()).unwrap();
    assert_eq!(h1.beds, 8);
    assert_eq!(h1.beds_in_service, 6.0);
    assert_eq!(h1.added_beds, 2);
    assert_eq!(
        h1.repair,
        vec![RequirementQuantity {
            requirement: RequirementRef::equipment("vent"),
            quantity: 2,
        }]
    );
    assert_eq!(h1.acquire.len(), 1);
    assert_eq!(
        h1.transfer_out,
        vec![TransferAction {
            requirement: RequirementRef::equipment("vent"),
            quantity: 1,
            counterpart: "h2".into(),
        }]
    );
    assert!(h1.transfer_in.is_empty());

    let h2 = plan.facility(&"h2".into()).unwrap();
    assert_eq!(h2.transfer_in[0].counterpart.as_str(), "h1");
    assert!(h2.transfer_out.is_empty());
    // the 1e-9 nurse purchase rounds away
    assert_eq!(
        h2.acquire,
        vec![RequirementQuantity {
            requirement: RequirementRef::consumable("mask"),
            quantity: 8,
        }]
    );
    assert_eq!(h2.added_beds, 2);

    assert_eq!(
        plan.summary,
        PlanSummary {
            facilities_served: 2,
            facilities_built: 0,
            beds_total: 10,
            added_beds_total: 4,
        }
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let problem = ProblemBuilder::new(&small_network())
        .demand(10.0)
        .build()
        .unwrap();
    let formulation = formulate(&problem);
    let assignment = network_assignment(&formulation);

    let first = extract_plan(&problem, &formulation, &assignment, 1.0).unwrap();
    let second = extract_plan(&problem, &formulation, &assignment, 1.0).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_newly_built_facility_reported() {
    let problem = ProblemBuilder::new(&small_network())
        .demand(4.0)
        .build()
        .unwrap();
    let formulation = formulate(&problem);
    let vars = formulation.variables();

    let mut assignment = Assignment::zeros(formulation.model().variable_count());
    for (f, beds) in [(0, 2.0), (1, 1.0), (2, 4.0)] {
        assignment.set(vars.beds(f), beds);
        assignment.set(vars.operating(f), 1.0);
    }

    let plan = extract_plan(&problem, &formulation, &assignment, 0.0).unwrap();
    let site = plan.facility(&"site".into()).unwrap();
    assert!(site.newly_built);
    assert_eq!(site.construction_cost, 1000.0);
    assert_eq!(site.beds_in_service, 0.0);
    assert_eq!(site.added_beds, 4);
    // h1 already supports 6 beds, so running 2 adds none
    assert_eq!(plan.facility(&"h1".into()).unwrap().added_beds, 0);
    assert_eq!(plan.summary.facilities_built, 1);
}

#[test]
fn test_operating_mismatch_is_inconsistent() {
    let problem = ProblemBuilder::new(&small_network())
        .demand(0.0)
        .build()
        .unwrap();
    let formulation = formulate(&problem);
    let vars = formulation.variables();
    let len = formulation.model().variable_count();

    let mut beds_not_operating = Assignment::zeros(len);
    beds_not_operating.set(vars.beds(2), 3.0);
    assert!(matches!(
        extract_plan(&problem, &formulation, &beds_not_operating, 0.0),
        Err(PlanningError::SolutionInconsistency(_))
    ));

    let mut operating_without_beds = Assignment::zeros(len);
    operating_without_beds.set(vars.operating(1), 1.0);
    assert!(matches!(
        extract_plan(&problem, &formulation, &operating_without_beds, 0.0),
        Err(PlanningError::SolutionInconsistency(_))
    ));
}

#[test]
fn test_fractional_or_negative_values_rejected() {
    let catalog = catalog(
        vec![FacilityRecord::new("h1", true, 0, 10).with_equipment("vent", 3, 0)],
        vec![EquipmentRecord::new("vent", 5000.0, 1.0, 100.0)],
        vec![],
        vec![],
        0.0,
    );
    let problem = ProblemBuilder::new(&catalog).demand(5.0).build().unwrap();
    let formulation = formulate(&problem);
    let vars = formulation.variables();
    let len = formulation.model().variable_count();

    let mut fractional = Assignment::zeros(len);
    fractional.set(vars.beds(0), 5.0);
    fractional.set(vars.operating(0), 1.0);
    fractional.set(vars.acquire(0, 0), 2.5);
    assert!(matches!(
        extract_plan(&problem, &formulation, &fractional, 0.0),
        Err(PlanningError::SolutionInconsistency(_))
    ));

    let mut negative = fractional.clone();
    negative.set(vars.acquire(0, 0), -2.0);
    assert!(matches!(
        extract_plan(&problem, &formulation, &negative, 0.0),
        Err(PlanningError::SolutionInconsistency(_))
    ));

    let short = Assignment::zeros(len - 1);
    assert!(matches!(
        extract_plan(&problem, &formulation, &short, 0.0),
        Err(PlanningError::SolutionInconsistency(_))
    ));
}
