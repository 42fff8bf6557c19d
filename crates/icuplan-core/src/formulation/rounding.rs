//! Turns a fractional relaxation into a feasible plan assignment.

use icuplan_milp::Assignment;

use super::{Formulation, FormulationOptions, Variables};
use crate::problem::Problem;

const SLACK: f64 = 1e-6;

/// Rounds beds up, then buys or repairs whatever the rounded beds still lack.
///
/// Owns a copy of the problem so a solver can hold it for a whole search.
#[derive(Debug, Clone)]
pub struct ShortfallRounding {
    problem: Problem,
    variables: Variables,
    options: FormulationOptions,
    variable_count: usize,
}

impl ShortfallRounding {
    pub fn new(problem: &Problem, formulation: &Formulation) -> Self {
        Self {
            problem: problem.clone(),
            variables: formulation.variables().clone(),
            options: formulation.options(),
            variable_count: formulation.model().variable_count(),
        }
    }

    /// A feasible assignment near `relaxation`, or `None` when the bed
    /// bounds cannot reach demand.
    pub fn round(&self, relaxation: &[f64]) -> Option<Assignment> {
        if relaxation.len() != self.variable_count {
            return None;
        }
        let problem = &self.problem;
        let vars = &self.variables;
        let facilities = problem.facility_count();
        let mut assignment = Assignment::zeros(self.variable_count);

        let beds = self.round_beds(relaxation)?;
        for (f, &count) in beds.iter().enumerate() {
            assignment.set(vars.beds(f), count as f64);
            assignment.set(vars.operating(f), if count > 0 { 1.0 } else { 0.0 });
        }

        for r in 0..problem.requirement_count() {
            for from in 0..facilities {
                for to in 0..facilities {
                    if let Some(transfer) = vars.transfer(r, from, to) {
                        let shipped = (relaxation[transfer.index()] + SLACK)
                            .floor()
                            .clamp(0.0, problem.holding(from, r) as f64);
                        assignment.set(transfer, shipped);
                    }
                }
            }
        }

        for f in 0..facilities {
            for (r, requirement) in problem.requirements().iter().enumerate() {
                let mut need =
                    requirement.necessary_rate * beds[f] as f64 - problem.holding(f, r) as f64;
                for other in 0..facilities {
                    if let Some(inbound) = vars.transfer(r, other, f) {
                        need -= assignment[inbound];
                    }
                    if let Some(outbound) = vars.transfer(r, f, other) {
                        need += assignment[outbound];
                    }
                }
                let shortfall = (need - SLACK).ceil().max(0.0);

                let mut repaired = 0.0;
                if let Some(repair) = vars.repair(f, r) {
                    let coefficient = self.options.repair_cost.coefficient(problem, f, r);
                    if coefficient <= requirement.unit_price {
                        repaired = shortfall.min(problem.needing_repair(f, r) as f64);
                        assignment.set(repair, repaired);
                    }
                }
                assignment.set(vars.acquire(f, r), shortfall - repaired);
            }
        }

        Some(assignment)
    }

    fn round_beds(&self, relaxation: &[f64]) -> Option<Vec<u64>> {
        let problem = &self.problem;
        let facilities = problem.facility_count();

        let mut beds: Vec<u64> = (0..facilities)
            .map(|f| {
                let facility = problem.facility(f);
                let upper = u64::from(facility.upper_beds);
                let relaxed = relaxation[self.variables.beds(f).index()];
                let count = ((relaxed - SLACK).ceil().max(0.0) as u64).min(upper);
                if count > 0 || facility.built {
                    count.max(u64::from(facility.lower_beds)).max(1).min(upper)
                } else {
                    0
                }
            })
            .collect();

        let target = (problem.demand() - SLACK).ceil().max(0.0) as u64;
        let mut total: u64 = beds.iter().sum();
        while total < target {
            let open_with_room = (0..facilities)
                .filter(|&f| beds[f] > 0 && beds[f] < u64::from(problem.facility(f).upper_beds))
                .max_by_key(|&f| u64::from(problem.facility(f).upper_beds) - beds[f]);
            if let Some(f) = open_with_room {
                let room = u64::from(problem.facility(f).upper_beds) - beds[f];
                let added = room.min(target - total);
                beds[f] += added;
                total += added;
                continue;
            }

            // open the cheapest closed facility
            let f = (0..facilities).filter(|&f| beds[f] == 0).min_by(|&a, &b| {
                problem
                    .facility(a)
                    .construction_cost
                    .total_cmp(&problem.facility(b).construction_cost)
            })?;
            let opened = u64::from(problem.facility(f).lower_beds).max(1);
            beds[f] = opened;
            total += opened;
        }

        Some(beds)
    }
}

impl Formulation {
    /// Rounding heuristic bound to this formulation.
    pub fn shortfall_rounding(&self, problem: &Problem) -> ShortfallRounding {
        ShortfallRounding::new(problem, self)
    }
}
