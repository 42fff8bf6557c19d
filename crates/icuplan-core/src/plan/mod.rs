//! The facility-level action plan and its extraction from a solved model.

mod extract;

#[cfg(test)]
mod tests;

pub use extract::extract_plan;

use serde::{Deserialize, Serialize};

use crate::domain::{FacilityId, RequirementRef};

/// Actions for every facility that ends up operating.
///
/// Facilities appear in problem index order and only when their bed count
/// is positive. All quantities are whole units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub facilities: Vec<FacilityActions>,
    /// Total cost of the plan as reported by the solver.
    pub objective_value: f64,
    pub summary: PlanSummary,
}

impl Plan {
    pub fn facility(&self, id: &FacilityId) -> Option<&FacilityActions> {
        self.facilities.iter().find(|actions| &actions.facility == id)
    }
}

/// Aggregates over [`Plan::facilities`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub facilities_served: usize,
    pub facilities_built: usize,
    pub beds_total: u64,
    pub added_beds_total: u64,
}

/// What to do at one facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityActions {
    pub facility: FacilityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The facility was not built before this plan.
    pub newly_built: bool,
    pub construction_cost: f64,
    pub beds: u64,
    /// Beds the pre-existing working stock already supports.
    pub beds_in_service: f64,
    pub added_beds: u64,
    pub acquire: Vec<RequirementQuantity>,
    pub repair: Vec<RequirementQuantity>,
    pub transfer_out: Vec<TransferAction>,
    pub transfer_in: Vec<TransferAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementQuantity {
    pub requirement: RequirementRef,
    pub quantity: u64,
}

/// A shipment seen from one end; `counterpart` is the other facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAction {
    pub requirement: RequirementRef,
    pub quantity: u64,
    pub counterpart: FacilityId,
}
