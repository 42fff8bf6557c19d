//! Requirements after merging the three catalogs.

use super::ids::{RequirementKind, RequirementRef};

/// Capability tag deciding which rows and variables apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Category {
    /// Equipment: broken units can be fixed at `repair_cost` per unit.
    Repairable { repair_cost: f64 },
    /// Staff and consumables.
    NonRepairable,
}

/// A requirement in the merged index space.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub key: RequirementRef,
    pub name: Option<String>,
    pub unit_price: f64,
    /// Units needed per ICU bed in service, overrides already applied.
    pub necessary_rate: f64,
    pub category: Category,
}

impl Requirement {
    pub fn kind(&self) -> RequirementKind {
        self.key.kind
    }

    pub fn is_repairable(&self) -> bool {
        matches!(self.category, Category::Repairable { .. })
    }

    pub fn repair_cost(&self) -> Option<f64> {
        match self.category {
            Category::Repairable { repair_cost } => Some(repair_cost),
            Category::NonRepairable => None,
        }
    }
}
