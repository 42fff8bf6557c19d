//! Maps a raw assignment back to facility actions.

use icuplan_milp::{Assignment, VarId};
use tracing::info;

use super::{FacilityActions, Plan, PlanSummary, RequirementQuantity, TransferAction};
use crate::error::PlanningError;
use crate::formulation::Formulation;
use crate::problem::Problem;

/// How far a solved value may sit from an integer.
const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Builds the [`Plan`] for a solved assignment of `formulation`.
///
/// Values are rounded to whole units. The function is pure: the same
/// assignment always yields the same plan.
///
/// # Errors
///
/// [`PlanningError::SolutionInconsistency`] if the assignment has the wrong
/// length, holds a negative or fractional integer value, or contradicts the
/// operating linkage (`operating = 0` with beds, or `operating = 1` without).
pub fn extract_plan(
    problem: &Problem,
    formulation: &Formulation,
    assignment: &Assignment,
    objective_value: f64,
) -> Result<Plan, PlanningError> {
    let expected = formulation.model().variable_count();
    if assignment.len() != expected {
        return Err(PlanningError::SolutionInconsistency(format!(
            "assignment has {} values, formulation has {expected} variables",
            assignment.len()
        )));
    }

    let reader = Reader {
        formulation,
        assignment,
    };
    let vars = formulation.variables();
    let facilities = problem.facility_count();
    let requirements = problem.requirement_count();

    let mut plan_facilities = Vec::new();
    for f in 0..facilities {
        let beds = reader.units(vars.beds(f))?;
        let operating = reader.units(vars.operating(f))?;
        let facility = problem.facility(f);

        match (operating, beds) {
            (0, b) if b > 0 => {
                return Err(PlanningError::SolutionInconsistency(format!(
                    "facility `{}` has {b} beds but is not operating",
                    facility.id
                )));
            }
            (1, 0) => {
                return Err(PlanningError::SolutionInconsistency(format!(
                    "facility `{}` is operating without beds",
                    facility.id
                )));
            }
            _ => {}
        }
        if beds == 0 {
            continue;
        }

        let mut acquire = Vec::new();
        let mut repair = Vec::new();
        for r in 0..requirements {
            let requirement = problem.requirement_key(r);
            let quantity = reader.units(vars.acquire(f, r))?;
            if quantity > 0 {
                acquire.push(RequirementQuantity {
                    requirement: requirement.clone(),
                    quantity,
                });
            }
            if let Some(var) = vars.repair(f, r) {
                let quantity = reader.units(var)?;
                if quantity > 0 {
                    repair.push(RequirementQuantity {
                        requirement: requirement.clone(),
                        quantity,
                    });
                }
            }
        }

        let mut transfer_out = Vec::new();
        let mut transfer_in = Vec::new();
        for r in 0..requirements {
            for other in 0..facilities {
                if let Some(var) = vars.transfer(r, f, other) {
                    let quantity = reader.units(var)?;
                    if quantity > 0 {
                        transfer_out.push(TransferAction {
                            requirement: problem.requirement_key(r).clone(),
                            quantity,
                            counterpart: problem.facility_id(other).clone(),
                        });
                    }
                }
                if let Some(var) = vars.transfer(r, other, f) {
                    let quantity = reader.units(var)?;
                    if quantity > 0 {
                        transfer_in.push(TransferAction {
                            requirement: problem.requirement_key(r).clone(),
                            quantity,
                            counterpart: problem.facility_id(other).clone(),
                        });
                    }
                }
            }
        }

        let beds_in_service = problem.beds_in_service(f);
        let added_beds = (beds as f64 - beds_in_service).floor().max(0.0) as u64;

        plan_facilities.push(FacilityActions {
            facility: facility.id.clone(),
            name: facility.name.clone(),
            newly_built: !facility.built,
            construction_cost: facility.construction_cost,
            beds,
            beds_in_service,
            added_beds,
            acquire,
            repair,
            transfer_out,
            transfer_in,
        });
    }

    let summary = PlanSummary {
        facilities_served: plan_facilities.len(),
        facilities_built: plan_facilities.iter().filter(|a| a.newly_built).count(),
        beds_total: plan_facilities.iter().map(|a| a.beds).sum(),
        added_beds_total: plan_facilities.iter().map(|a| a.added_beds).sum(),
    };

    info!(
        event = "plan_extracted",
        facilities_served = summary.facilities_served,
        facilities_built = summary.facilities_built,
        beds = summary.beds_total,
        added_beds = summary.added_beds_total,
        objective = objective_value,
    );

    Ok(Plan {
        facilities: plan_facilities,
        objective_value,
        summary,
    })
}

struct Reader<'a> {
    formulation: &'a Formulation,
    assignment: &'a Assignment,
}

impl Reader<'_> {
    /// The whole-unit value of `var`.
    fn units(&self, var: VarId) -> Result<u64, PlanningError> {
        let value = self.assignment[var];
        let rounded = value.round();
        if !value.is_finite()
            || rounded < 0.0
            || (value - rounded).abs() > INTEGRALITY_TOLERANCE
        {
            let name = self.formulation.model().variable(var).name();
            return Err(PlanningError::SolutionInconsistency(format!(
                "`{name}` = {value} is not a non-negative whole number"
            )));
        }
        Ok(rounded as u64)
    }
}
