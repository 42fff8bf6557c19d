//! MILP formulation of the capacity-expansion problem.
//!
//! Variables are created in a fixed order (beds, operating, acquire, repair,
//! transfer) so the same problem always yields the same model.

mod rounding;
mod variables;


pub use rounding::ShortfallRounding;
pub use variables::Variables;

use icuplan_milp::{ConstraintOp, LinearExpr, Model, ObjectiveSense};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PlanningError;
use crate::problem::Problem;

/// Coefficient of `repair[f, r]` in the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairCostMode {
    /// The requirement's per-unit repair cost.
    #[default]
    PerUnitCost,
    /// The number of units needing repair at the facility.
    UnitsNeedingRepair,
}

impl RepairCostMode {
    pub fn coefficient(self, problem: &Problem, f: usize, r: usize) -> f64 {
        match self {
            RepairCostMode::PerUnitCost => problem.requirement(r).repair_cost().unwrap_or(0.0),
            RepairCostMode::UnitsNeedingRepair => problem.needing_repair(f, r) as f64,
        }
    }
}

/// Knobs that change the model without changing the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FormulationOptions {
    #[serde(default)]
    pub repair_cost: RepairCostMode,
}

impl FormulationOptions {
    pub fn with_repair_cost(mut self, mode: RepairCostMode) -> Self {
        self.repair_cost = mode;
        self
    }
}

/// The model together with the handles of every decision variable.
#[derive(Debug, Clone)]
pub struct Formulation {
    model: Model,
    variables: Variables,
    options: FormulationOptions,
}

impl Formulation {
    pub fn new(problem: &Problem, options: FormulationOptions) -> Result<Self, PlanningError> {
        let mut model = Model::new("icu_capacity_expansion");
        let variables = Variables::declare(&mut model, problem)?;

        model.set_objective(
            ObjectiveSense::Minimize,
            objective(problem, &variables, options),
        )?;
        add_constraints(&mut model, problem, &variables)?;

        info!(
            event = "formulation_built",
            variables = model.variable_count(),
            integer_variables = model.integer_variable_count(),
            constraints = model.constraint_count(),
        );

        Ok(Self {
            model,
            variables,
            options,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn options(&self) -> FormulationOptions {
        self.options
    }

    /// Objective coefficient of `repair[f, r]` under this formulation.
    pub fn repair_coefficient(&self, problem: &Problem, f: usize, r: usize) -> f64 {
        self.options.repair_cost.coefficient(problem, f, r)
    }

    /// CPLEX LP rendering of the model with symbolic names.
    pub fn to_lp_string(&self) -> String {
        self.model.to_lp_string()
    }
}

fn objective(problem: &Problem, vars: &Variables, options: FormulationOptions) -> LinearExpr {
    let mut expr = LinearExpr::new();
    let facilities = problem.facility_count();

    for f in 0..facilities {
        let cost = problem.facility(f).construction_cost;
        if cost != 0.0 {
            expr += (vars.operating(f), cost);
        }
    }

    for f in 0..facilities {
        for (r, requirement) in problem.requirements().iter().enumerate() {
            expr += (vars.acquire(f, r), requirement.unit_price);
        }
        for r in problem.repairable() {
            if let Some(repair) = vars.repair(f, r) {
                expr += (repair, options.repair_cost.coefficient(problem, f, r));
            }
        }
    }

    for r in 0..problem.requirement_count() {
        for from in 0..facilities {
            for to in 0..facilities {
                if let Some(transfer) = vars.transfer(r, from, to) {
                    expr += (transfer, problem.transfer_cost(r, from, to));
                }
            }
        }
    }

    expr
}

fn add_constraints(
    model: &mut Model,
    problem: &Problem,
    vars: &Variables,
) -> Result<(), PlanningError> {
    let facilities = problem.facility_count();

    let demand: LinearExpr = (0..facilities).map(|f| (vars.beds(f), 1.0)).collect();
    model.add_constraint("demand", demand, ConstraintOp::Ge, problem.demand())?;

    for f in 0..facilities {
        let fid = problem.facility_id(f);

        // holdings + acquire + repair + inbound - outbound >= rate * beds
        for (r, requirement) in problem.requirements().iter().enumerate() {
            let mut balance = LinearExpr::new()
                .term(vars.acquire(f, r), 1.0)
                .term(vars.beds(f), -requirement.necessary_rate);
            if let Some(repair) = vars.repair(f, r) {
                balance += (repair, 1.0);
            }
            for other in 0..facilities {
                if let Some(inbound) = vars.transfer(r, other, f) {
                    balance += (inbound, 1.0);
                }
                if let Some(outbound) = vars.transfer(r, f, other) {
                    balance += (outbound, -1.0);
                }
            }
            let row = if requirement.is_repairable() {
                "repairable_balance"
            } else {
                "non_repairable_balance"
            };
            model.add_constraint(
                format!("{row}({fid},{})", requirement.key),
                balance,
                ConstraintOp::Ge,
                -(problem.holding(f, r) as f64),
            )?;
        }

        for r in problem.repairable() {
            if let Some(repair) = vars.repair(f, r) {
                model.add_constraint(
                    format!("repair_capacity({fid},{})", problem.requirement_key(r)),
                    LinearExpr::from(repair),
                    ConstraintOp::Le,
                    problem.needing_repair(f, r) as f64,
                )?;
            }
        }

        let facility = problem.facility(f);
        let beds = vars.beds(f);
        let operating = vars.operating(f);

        model.add_constraint(
            format!("bed_lower({fid})"),
            LinearExpr::new()
                .term(operating, f64::from(facility.lower_beds))
                .term(beds, -1.0),
            ConstraintOp::Le,
            0.0,
        )?;
        model.add_constraint(
            format!("bed_upper({fid})"),
            LinearExpr::from(beds),
            ConstraintOp::Le,
            f64::from(facility.upper_beds),
        )?;

        if facility.built {
            model.add_constraint(
                format!("already_built({fid})"),
                LinearExpr::from(operating),
                ConstraintOp::Eq,
                1.0,
            )?;
        }

        // beds / upper <= operating <= beds
        model.add_constraint(
            format!("operating_if_beds({fid})"),
            LinearExpr::new()
                .term(beds, 1.0)
                .term(operating, -f64::from(facility.upper_beds)),
            ConstraintOp::Le,
            0.0,
        )?;
        model.add_constraint(
            format!("beds_if_operating({fid})"),
            LinearExpr::new().term(operating, 1.0).term(beds, -1.0),
            ConstraintOp::Le,
            0.0,
        )?;
    }

    // shipments are capped by the sender's pre-existing working stock
    for r in 0..problem.requirement_count() {
        let rid = problem.requirement_key(r);
        for from in 0..facilities {
            for to in 0..facilities {
                if let Some(transfer) = vars.transfer(r, from, to) {
                    model.add_constraint(
                        format!(
                            "transfer_availability({rid},{},{})",
                            problem.facility_id(from),
                            problem.facility_id(to)
                        ),
                        LinearExpr::from(transfer),
                        ConstraintOp::Le,
                        problem.holding(from, r) as f64,
                    )?;
                }
            }
        }
    }

    Ok(())
}
