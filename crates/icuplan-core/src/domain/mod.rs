//! Domain records: facilities, requirements, holdings and the catalog
//! snapshot they arrive in.

mod catalog;
mod facility;
mod ids;
mod index;
mod requirement;
mod source;
mod transfer;

#[cfg(test)]
mod tests;

pub use catalog::{
    Catalog, ConsumableRecord, EquipmentHolding, EquipmentRecord, FacilityRecord, Holdings,
    RateOverrides, StaffRecord,
};
pub use facility::Facility;
pub use ids::{FacilityId, RequirementId, RequirementKind, RequirementRef};
pub use index::IdTable;
pub use requirement::{Category, Requirement};
pub use source::{CatalogProvider, DemandSource};
pub use transfer::TransferCostTable;
