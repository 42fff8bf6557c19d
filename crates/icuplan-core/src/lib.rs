//! icuplan Core - ICU capacity expansion as a mixed-integer program
//!
//! This crate turns a facility/requirement catalog and a bed-demand target
//! into a minimum-cost expansion plan:
//! - Domain records for facilities, requirements, holdings and transfer costs
//! - [`ProblemBuilder`] producing a frozen, index-normalized [`Problem`]
//! - [`Formulation`] declaring the decision variables, objective and rows
//! - [`extract_plan`] mapping a solved assignment back to facility actions

pub mod domain;
pub mod error;
pub mod formulation;
pub mod plan;
pub mod problem;

#[cfg(test)]
mod test_utils;

pub use domain::{
    Catalog, CatalogProvider, Category, ConsumableRecord, DemandSource, EquipmentHolding,
    EquipmentRecord, Facility, FacilityId, FacilityRecord, Holdings, IdTable, RateOverrides,
    Requirement, RequirementId, RequirementKind, RequirementRef, StaffRecord, TransferCostTable,
};
pub use error::{DataError, DemandError, PlanningError};
pub use formulation::{
    Formulation, FormulationOptions, RepairCostMode, ShortfallRounding, Variables,
};
pub use plan::{
    extract_plan, FacilityActions, Plan, PlanSummary, RequirementQuantity, TransferAction,
};
pub use problem::{Problem, ProblemBuilder};
