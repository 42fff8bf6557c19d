//! Demand sources.

use icuplan_core::{DemandError, DemandSource};

/// The same bed demand for every horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDemand(pub f64);

impl FixedDemand {
    pub fn new(beds: f64) -> Self {
        FixedDemand(beds)
    }
}

impl DemandSource for FixedDemand {
    fn demand(&self, _horizon: u32) -> Result<f64, DemandError> {
        Ok(self.0)
    }
}

/// A source that has no forecast; planning succeeds only when the
/// configuration supplies a fixed demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoForecast;

impl DemandSource for NoForecast {
    fn demand(&self, horizon: u32) -> Result<f64, DemandError> {
        Err(DemandError(format!(
            "no forecast available for a {horizon}-day horizon; set a fixed demand"
        )))
    }
}
