//! Facilities in the problem's dense index space.

use super::ids::FacilityId;

/// A facility as seen by the formulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub id: FacilityId,
    pub name: Option<String>,
    pub built: bool,
    pub lower_beds: u32,
    pub upper_beds: u32,
    /// Zero for already-built facilities.
    pub construction_cost: f64,
}
