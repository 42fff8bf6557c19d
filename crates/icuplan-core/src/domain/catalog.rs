//! Catalog snapshot as supplied by the catalog provider.
//!
//! These are plain serde records; validation happens in
//! [`ProblemBuilder`](crate::ProblemBuilder).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{FacilityId, RequirementId, RequirementKind, RequirementRef};
use super::transfer::TransferCostTable;

/// Everything the problem builder needs besides demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Catalog {
    #[serde(default)]
    pub facilities: Vec<FacilityRecord>,

    #[serde(default)]
    pub equipment: Vec<EquipmentRecord>,

    #[serde(default)]
    pub staff: Vec<StaffRecord>,

    #[serde(default)]
    pub consumables: Vec<ConsumableRecord>,

    /// Requirement-major table in merged order (equipment, staff, consumables).
    #[serde(default)]
    pub transfer_costs: TransferCostTable,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirement references in merged index order: equipment first, then
    /// staff, then consumables, each in catalog order.
    pub fn requirement_refs(&self) -> Vec<RequirementRef> {
        let equipment = self
            .equipment
            .iter()
            .map(|e| RequirementRef::new(RequirementKind::Equipment, e.id.as_str()));
        let staff = self
            .staff
            .iter()
            .map(|s| RequirementRef::new(RequirementKind::Staff, s.id.as_str()));
        let consumables = self
            .consumables
            .iter()
            .map(|c| RequirementRef::new(RequirementKind::Consumable, c.id.as_str()));
        equipment.chain(staff).chain(consumables).collect()
    }

    pub fn requirement_count(&self) -> usize {
        self.equipment.len() + self.staff.len() + self.consumables.len()
    }
}

/// A facility row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FacilityRecord {
    pub id: FacilityId,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub built: bool,

    /// Minimum ICU beds if the facility operates.
    #[serde(default)]
    pub lower_beds: u32,

    pub upper_beds: u32,

    /// Ignored for facilities that are already built.
    #[serde(default)]
    pub construction_cost: f64,

    #[serde(default)]
    pub holdings: Holdings,
}

impl FacilityRecord {
    pub fn new(id: impl Into<String>, built: bool, lower_beds: u32, upper_beds: u32) -> Self {
        Self {
            id: FacilityId::new(id),
            name: None,
            built,
            lower_beds,
            upper_beds,
            construction_cost: 0.0,
            holdings: Holdings::default(),
        }
    }

    pub fn with_construction_cost(mut self, cost: f64) -> Self {
        self.construction_cost = cost;
        self
    }

    pub fn with_equipment(mut self, id: &str, working: i64, needing_repair: i64) -> Self {
        self.holdings.equipment.insert(
            RequirementId::new(id),
            EquipmentHolding {
                working,
                needing_repair,
            },
        );
        self
    }

    pub fn with_staff(mut self, id: &str, count: i64) -> Self {
        self.holdings.staff.insert(RequirementId::new(id), count);
        self
    }

    pub fn with_consumable(mut self, id: &str, count: i64) -> Self {
        self.holdings.consumables.insert(RequirementId::new(id), count);
        self
    }
}

/// Current stock of a facility, per catalog. Missing entries mean zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Holdings {
    #[serde(default)]
    pub equipment: BTreeMap<RequirementId, EquipmentHolding>,

    #[serde(default)]
    pub staff: BTreeMap<RequirementId, i64>,

    #[serde(default)]
    pub consumables: BTreeMap<RequirementId, i64>,
}

/// Working and broken units of one piece of equipment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EquipmentHolding {
    pub working: i64,

    #[serde(default)]
    pub needing_repair: i64,
}

/// Equipment catalog row. Equipment is the repairable category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EquipmentRecord {
    pub id: RequirementId,

    #[serde(default)]
    pub name: Option<String>,

    pub unit_price: f64,

    pub necessary_rate: f64,

    /// Cost of fixing one broken unit (maintenance cost).
    #[serde(default, alias = "maintenance_cost")]
    pub repair_cost: f64,
}

impl EquipmentRecord {
    pub fn new(id: &str, unit_price: f64, necessary_rate: f64, repair_cost: f64) -> Self {
        Self {
            id: RequirementId::new(id),
            name: None,
            unit_price,
            necessary_rate,
            repair_cost,
        }
    }
}

/// Staff catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StaffRecord {
    pub id: RequirementId,

    #[serde(default)]
    pub team: Option<String>,

    /// Salary, used as the unit price of hiring one professional.
    #[serde(alias = "unit_price")]
    pub salary: f64,

    /// Professionals per bed and per shift.
    pub necessary_rate: f64,

    /// Length of one shift. When set, the effective rate covers a full week:
    /// `ceil(168 / shift_hours) * necessary_rate`.
    #[serde(default)]
    pub shift_hours: Option<u32>,
}

impl StaffRecord {
    pub fn new(id: &str, salary: f64, necessary_rate: f64) -> Self {
        Self {
            id: RequirementId::new(id),
            team: None,
            salary,
            necessary_rate,
            shift_hours: None,
        }
    }

    pub fn with_shift_hours(mut self, hours: u32) -> Self {
        self.shift_hours = Some(hours);
        self
    }
}

/// Consumable catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConsumableRecord {
    pub id: RequirementId,

    #[serde(default)]
    pub name: Option<String>,

    pub unit_price: f64,

    pub necessary_rate: f64,
}

impl ConsumableRecord {
    pub fn new(id: &str, unit_price: f64, necessary_rate: f64) -> Self {
        Self {
            id: RequirementId::new(id),
            name: None,
            unit_price,
            necessary_rate,
        }
    }
}

/// Caller-supplied necessary-rate overrides, keyed per catalog.
///
/// For staff with a shift length the override replaces the per-shift rate
/// and is scaled by the weekly shift count like the catalog value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateOverrides {
    #[serde(default)]
    pub equipment: BTreeMap<RequirementId, f64>,

    #[serde(default)]
    pub staff: BTreeMap<RequirementId, f64>,

    #[serde(default, alias = "consumables")]
    pub consumable: BTreeMap<RequirementId, f64>,
}

impl RateOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, requirement: &RequirementRef) -> Option<f64> {
        self.table(requirement.kind).get(&requirement.id).copied()
    }

    pub fn set(&mut self, requirement: RequirementRef, rate: f64) {
        let table = match requirement.kind {
            RequirementKind::Equipment => &mut self.equipment,
            RequirementKind::Staff => &mut self.staff,
            RequirementKind::Consumable => &mut self.consumable,
        };
        table.insert(requirement.id, rate);
    }

    pub fn with(mut self, requirement: RequirementRef, rate: f64) -> Self {
        self.set(requirement, rate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.equipment.is_empty() && self.staff.is_empty() && self.consumable.is_empty()
    }

    /// All overrides as `(requirement, rate)` in kind then id order.
    pub fn entries(&self) -> Vec<(RequirementRef, f64)> {
        let mut entries = Vec::new();
        for kind in [
            RequirementKind::Equipment,
            RequirementKind::Staff,
            RequirementKind::Consumable,
        ] {
            for (id, &rate) in self.table(kind) {
                entries.push((RequirementRef { kind, id: id.clone() }, rate));
            }
        }
        entries
    }

    fn table(&self, kind: RequirementKind) -> &BTreeMap<RequirementId, f64> {
        match kind {
            RequirementKind::Equipment => &self.equipment,
            RequirementKind::Staff => &self.staff,
            RequirementKind::Consumable => &self.consumable,
        }
    }
}
