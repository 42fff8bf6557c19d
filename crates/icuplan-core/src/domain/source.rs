//! External collaborators feeding the problem builder.

use super::catalog::Catalog;
use crate::error::{DemandError, PlanningError};

/// Supplies a read-only catalog snapshot.
pub trait CatalogProvider {
    fn catalog(&self) -> Result<Catalog, PlanningError>;
}

impl CatalogProvider for Catalog {
    fn catalog(&self) -> Result<Catalog, PlanningError> {
        Ok(self.clone())
    }
}

/// Supplies the ICU bed demand for a forecast horizon (in days).
pub trait DemandSource {
    fn demand(&self, horizon: u32) -> Result<f64, DemandError>;
}

impl<F> DemandSource for F
where
    F: Fn(u32) -> Result<f64, DemandError>,
{
    fn demand(&self, horizon: u32) -> Result<f64, DemandError> {
        self(horizon)
    }
}
