//! icuplan - minimum-cost ICU capacity expansion planning
//!
//! Given hospital facilities, their current stock of equipment, staff and
//! consumables, and a bed demand, icuplan decides where to open or expand
//! ICU capacity and which resources to buy, repair or move between sites.
//!
//! # Example
//!
//! ```rust
//! use icuplan::prelude::*;
//!
//! let mut catalog = Catalog::new();
//! catalog.facilities.push(
//!     FacilityRecord::new("central", true, 0, 10)
//!         .with_equipment("ventilator", 3, 1)
//!         .with_staff("nurse", 12),
//! );
//! catalog.equipment.push(EquipmentRecord::new("ventilator", 5000.0, 1.0, 150.0));
//! catalog.staff.push(StaffRecord::new("nurse", 3000.0, 2.0));
//! catalog.transfer_costs = TransferCostTable::uniform(2, 1, 0.0);
//!
//! let report = Planner::new(PlannerConfig::default())
//!     .plan(&catalog, &FixedDemand(4.0))
//!     .unwrap();
//!
//! // the broken ventilator is repaired rather than replaced
//! assert_eq!(report.plan.objective_value, 150.0);
//! ```

pub mod catalog;
pub mod demand;
pub mod planner;

pub use catalog::{CatalogFormat, FileCatalog};
pub use demand::{FixedDemand, NoForecast};
pub use planner::{PlanReport, PlanRounding, Planner};

// Configuration
pub use icuplan_config::{
    ConfigError, DemandSettings, ObjectiveSettings, PlannerConfig, SolverSettings,
};

// Domain, problem, formulation and plan
pub use icuplan_core::{
    extract_plan, Catalog, CatalogProvider, ConsumableRecord, DataError, DemandError,
    DemandSource, EquipmentHolding, EquipmentRecord, FacilityActions, FacilityId,
    FacilityRecord, Formulation, FormulationOptions, Holdings, Plan, PlanSummary,
    PlanningError, Problem, ProblemBuilder, RateOverrides, RepairCostMode, RequirementId,
    RequirementKind, RequirementQuantity, RequirementRef, ShortfallRounding, StaffRecord,
    TransferAction, TransferCostTable,
};

// Solver backends
pub use icuplan_solver::{
    BranchAndBoundSolver, Incumbent, PrimalHeuristic, RoundUp, SolveOptions, SolveOutcome,
    SolveStatus, SolverAdapter, SolverStatistics,
};

#[cfg(feature = "highs")]
pub use icuplan_solver::HighsSolver;

/// The MILP model layer, for custom [`SolverAdapter`] implementations.
pub use icuplan_milp as milp;

/// Colorful console output for planning runs.
#[cfg(feature = "console")]
pub use icuplan_console as console;

pub mod prelude {
    pub use super::{
        Catalog, CatalogProvider, ConsumableRecord, DemandSource, EquipmentRecord,
        FacilityRecord, FileCatalog, FixedDemand, PlanReport, Planner, PlannerConfig,
        RepairCostMode, StaffRecord, TransferCostTable,
    };
}
