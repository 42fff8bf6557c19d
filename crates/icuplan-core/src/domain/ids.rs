//! External identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifier of a facility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(String);

impl FacilityId {
    pub fn new(id: impl Into<String>) -> Self {
        FacilityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FacilityId {
    fn from(id: &str) -> Self {
        FacilityId::new(id)
    }
}

/// Identifier of a requirement within its own catalog.
///
/// Equipment, staff and consumable catalogs are numbered independently, so
/// an id is only unique together with its [`RequirementKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(String);

impl RequirementId {
    pub fn new(id: impl Into<String>) -> Self {
        RequirementId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequirementId {
    fn from(id: &str) -> Self {
        RequirementId::new(id)
    }
}

/// The catalog a requirement comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Equipment,
    Staff,
    Consumable,
}

impl RequirementKind {
    /// Only equipment can be fixed in place.
    pub fn is_repairable(self) -> bool {
        matches!(self, RequirementKind::Equipment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequirementKind::Equipment => "equipment",
            RequirementKind::Staff => "staff",
            RequirementKind::Consumable => "consumable",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Globally unique requirement reference: `(kind, id)`.
///
/// Displays as `kind.id`, e.g. `equipment.ventilator`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequirementRef {
    pub kind: RequirementKind,
    pub id: RequirementId,
}

impl RequirementRef {
    pub fn new(kind: RequirementKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: RequirementId::new(id),
        }
    }

    pub fn equipment(id: impl Into<String>) -> Self {
        Self::new(RequirementKind::Equipment, id)
    }

    pub fn staff(id: impl Into<String>) -> Self {
        Self::new(RequirementKind::Staff, id)
    }

    pub fn consumable(id: impl Into<String>) -> Self {
        Self::new(RequirementKind::Consumable, id)
    }
}

impl fmt::Display for RequirementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.id)
    }
}
