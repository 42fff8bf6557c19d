//! The frozen, index-normalized optimization input.

mod builder;


pub use builder::ProblemBuilder;

use crate::domain::{
    Facility, FacilityId, IdTable, RateOverrides, Requirement, RequirementRef, TransferCostTable,
};

/// Immutable input to the formulation.
///
/// Facilities are indexed `0..F` in catalog order. Requirements are indexed
/// `0..R+N` with the `R` repairable (equipment) entries first, then staff,
/// then consumables. Per-facility arrays use the same indices.
#[derive(Debug, Clone)]
pub struct Problem {
    facility_ids: IdTable<FacilityId>,
    facilities: Vec<Facility>,
    requirement_ids: IdTable<RequirementRef>,
    requirements: Vec<Requirement>,
    repairable_count: usize,
    /// `[f][r]` working units; zero rows for unbuilt facilities.
    holdings: Vec<Vec<u64>>,
    /// `[f][r]` broken units over the repairable prefix only.
    needing_repair: Vec<Vec<u64>>,
    transfer_costs: TransferCostTable,
    rate_overrides: RateOverrides,
    demand: f64,
}

impl Problem {
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn facility(&self, f: usize) -> &Facility {
        &self.facilities[f]
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    pub fn facility_index(&self, id: &FacilityId) -> Option<usize> {
        self.facility_ids.index_of(id)
    }

    pub fn facility_id(&self, f: usize) -> &FacilityId {
        self.facility_ids.id(f)
    }

    /// Indices of the facilities that must stay operating.
    pub fn built_facilities(&self) -> impl Iterator<Item = usize> + '_ {
        self.facilities
            .iter()
            .enumerate()
            .filter(|(_, facility)| facility.built)
            .map(|(f, _)| f)
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn requirement(&self, r: usize) -> &Requirement {
        &self.requirements[r]
    }

    pub fn requirement_count(&self) -> usize {
        self.requirements.len()
    }

    pub fn requirement_index(&self, key: &RequirementRef) -> Option<usize> {
        self.requirement_ids.index_of(key)
    }

    pub fn requirement_key(&self, r: usize) -> &RequirementRef {
        self.requirement_ids.id(r)
    }

    /// Number of repairable requirements; they occupy indices `0..R`.
    pub fn repairable_count(&self) -> usize {
        self.repairable_count
    }

    pub fn repairable(&self) -> std::ops::Range<usize> {
        0..self.repairable_count
    }

    pub fn non_repairable(&self) -> std::ops::Range<usize> {
        self.repairable_count..self.requirements.len()
    }

    pub fn holding(&self, f: usize, r: usize) -> u64 {
        self.holdings[f][r]
    }

    /// Broken units of `r` at `f`; zero for non-repairable requirements.
    pub fn needing_repair(&self, f: usize, r: usize) -> u64 {
        if r < self.repairable_count {
            self.needing_repair[f][r]
        } else {
            0
        }
    }

    pub fn transfer_cost(&self, r: usize, from: usize, to: usize) -> f64 {
        self.transfer_costs.cost(r, from, to)
    }

    pub fn transfer_costs(&self) -> &TransferCostTable {
        &self.transfer_costs
    }

    pub fn rate_overrides(&self) -> &RateOverrides {
        &self.rate_overrides
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Beds the current working stock of `f` supports: the bottleneck
    /// `holdings / necessary_rate` over all requirements, or zero when the
    /// catalog has no requirements.
    pub fn beds_in_service(&self, f: usize) -> f64 {
        self.requirements
            .iter()
            .enumerate()
            .map(|(r, requirement)| self.holdings[f][r] as f64 / requirement.necessary_rate)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Largest bed count the demand can be met with.
    pub fn total_bed_capacity(&self) -> u64 {
        self.facilities.iter().map(|f| u64::from(f.upper_beds)).sum()
    }
}
