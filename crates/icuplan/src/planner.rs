//! The end-to-end planning pipeline.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use icuplan_config::PlannerConfig;
use icuplan_core::{
    extract_plan, CatalogProvider, DemandSource, Formulation, Plan, PlanningError, Problem,
    ProblemBuilder, ShortfallRounding,
};
use icuplan_milp::{Assignment, Model};
use icuplan_solver::{
    BranchAndBoundSolver, PrimalHeuristic, SolveOptions, SolveStatus, SolverAdapter,
    SolverStatistics,
};
use serde::Serialize;
use tracing::{debug, warn};

/// A plan together with how the solver got there.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub plan: Plan,
    pub status: SolveStatus,
    /// False when the search stopped at a limit with a feasible plan.
    pub optimal: bool,
    pub statistics: SolverStatistics,
}

/// Runs catalog snapshot and demand through problem building,
/// formulation, solving and plan extraction.
///
/// Every call builds its own problem and formulation, so one planner can
/// serve concurrent requests.
///
/// # Examples
///
/// ```
/// use icuplan::{Catalog, EquipmentRecord, FacilityRecord, FixedDemand, Planner, PlannerConfig};
/// use icuplan::TransferCostTable;
///
/// let mut catalog = Catalog::new();
/// catalog.facilities.push(FacilityRecord::new("central", true, 0, 10).with_equipment("vent", 2, 0));
/// catalog.equipment.push(EquipmentRecord::new("vent", 500.0, 1.0, 50.0));
/// catalog.transfer_costs = TransferCostTable::uniform(1, 1, 0.0);
///
/// let report = Planner::new(PlannerConfig::default())
///     .plan(&catalog, &FixedDemand(4.0))
///     .unwrap();
///
/// assert!(report.optimal);
/// assert_eq!(report.plan.objective_value, 1000.0);
/// ```
pub struct Planner {
    config: PlannerConfig,
    solver: Box<dyn SolverAdapter>,
    terminate: Option<Arc<AtomicBool>>,
}

impl Planner {
    /// Creates a planner backed by the branch-and-bound solver configured
    /// from `config.solver`.
    pub fn new(config: PlannerConfig) -> Self {
        let solver = BranchAndBoundSolver::from_settings(&config.solver);
        Self {
            config,
            solver: Box::new(solver),
            terminate: None,
        }
    }

    /// Replaces the solver backend.
    pub fn with_solver(mut self, solver: impl SolverAdapter + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    /// Cancels the solve once `flag` is set.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate = Some(flag);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Fetches the catalog and builds the problem. A demand in the
    /// configuration takes precedence over `demand`.
    pub fn build_problem(
        &self,
        catalog: &dyn CatalogProvider,
        demand: &dyn DemandSource,
    ) -> Result<Problem, PlanningError> {
        let catalog = catalog.catalog()?;
        let problem = ProblemBuilder::new(&catalog)
            .rate_overrides(self.config.rate_overrides.clone())
            .demand(self.config.demand.value)
            .demand_source(demand, self.config.demand.horizon)
            .build()?;
        Ok(problem)
    }

    pub fn formulate(&self, problem: &Problem) -> Result<Formulation, PlanningError> {
        Formulation::new(problem, self.config.formulation_options())
    }

    /// Runs the whole pipeline.
    pub fn plan(
        &self,
        catalog: &dyn CatalogProvider,
        demand: &dyn DemandSource,
    ) -> Result<PlanReport, PlanningError> {
        let problem = self.build_problem(catalog, demand)?;
        self.solve(&problem)
    }

    /// Formulates and solves an already built problem.
    ///
    /// # Errors
    ///
    /// [`PlanningError::Infeasible`] and [`PlanningError::TimedOut`] when no
    /// plan exists or none was found in time; the plan is never extracted
    /// in either case.
    pub fn solve(&self, problem: &Problem) -> Result<PlanReport, PlanningError> {
        let formulation = self.formulate(problem)?;

        let rounding = PlanRounding::new(problem, &formulation);
        let mut options = SolveOptions::new().with_heuristic(Arc::new(rounding));
        if let Some(limit) = self.config.time_limit() {
            options = options.with_time_limit(limit);
        }
        if let Some(flag) = &self.terminate {
            options = options.with_terminate_flag(flag.clone());
        }

        let outcome = self.solver.solve(formulation.model(), &options);
        debug!(event = "solver_returned", status = %outcome.status);

        match outcome.status {
            SolveStatus::Infeasible => return Err(PlanningError::Infeasible),
            SolveStatus::TimedOut => return Err(PlanningError::TimedOut),
            SolveStatus::Error => {
                return Err(PlanningError::Solver(
                    outcome
                        .message
                        .unwrap_or_else(|| "solver failed without a message".to_string()),
                ))
            }
            SolveStatus::Optimal | SolveStatus::Feasible => {}
        }

        let Some(assignment) = outcome.assignment else {
            return Err(PlanningError::Solver(format!(
                "solver reported {} without an assignment",
                outcome.status
            )));
        };
        let objective = match outcome.objective_value {
            Some(value) => value,
            None => formulation.model().objective_value(&assignment)?,
        };

        let plan = extract_plan(problem, &formulation, &assignment, objective)?;
        let optimal = outcome.status == SolveStatus::Optimal;
        if !optimal {
            warn!(
                event = "plan_not_optimal",
                objective, "search stopped at a limit; plan is feasible but not proven optimal"
            );
        }

        Ok(PlanReport {
            plan,
            status: outcome.status,
            optimal,
            statistics: outcome.statistics,
        })
    }
}

/// [`ShortfallRounding`] as a solver heuristic: every fractional node is
/// offered a rounded plan. [`Planner::solve`] installs one automatically.
#[derive(Debug)]
pub struct PlanRounding(ShortfallRounding);

impl PlanRounding {
    pub fn new(problem: &Problem, formulation: &Formulation) -> Self {
        Self(formulation.shortfall_rounding(problem))
    }
}

impl PrimalHeuristic for PlanRounding {
    fn propose(&self, _model: &Model, relaxation: &[f64]) -> Option<Assignment> {
        self.0.round(relaxation)
    }
}
