//! Configuration system for icuplan.
//!
//! Load planner configuration from TOML or YAML files to control the solver
//! budget, the demand override, objective options and rate overrides
//! without code changes.
//!
//! # Examples
//!
//! ```
//! use icuplan_config::PlannerConfig;
//! use icuplan_core::RepairCostMode;
//! use std::time::Duration;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     [solver]
//!     time_limit_secs = 10
//!
//!     [demand]
//!     value = 40.0
//!
//!     [objective]
//!     repair_cost = "units_needing_repair"
//!
//!     [rate_overrides.staff]
//!     nurse = 0.5
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(10)));
//! assert_eq!(config.demand.value, Some(40.0));
//! assert_eq!(config.objective.repair_cost, RepairCostMode::UnitsNeedingRepair);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use icuplan_config::PlannerConfig;
//!
//! let config = PlannerConfig::load("icuplan.toml").unwrap_or_default();
//! ```

use std::path::Path;
use std::time::Duration;

use icuplan_core::{FormulationOptions, RateOverrides, RepairCostMode, RequirementRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    #[serde(default)]
    pub solver: SolverSettings,

    #[serde(default)]
    pub demand: DemandSettings,

    #[serde(default)]
    pub objective: ObjectiveSettings,

    /// Necessary-rate overrides per requirement catalog.
    #[serde(default)]
    pub rate_overrides: RateOverrides,
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing YAML for `.yaml`/`.yml`
    /// and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, fails to parse or holds
    /// out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let solver = &self.solver;
        if !(solver.absolute_gap.is_finite() && solver.absolute_gap >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "solver.absolute_gap must be non-negative, got {}",
                solver.absolute_gap
            )));
        }
        if !(solver.integrality_tolerance > 0.0 && solver.integrality_tolerance < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "solver.integrality_tolerance must lie in (0, 0.5), got {}",
                solver.integrality_tolerance
            )));
        }
        if let Some(value) = self.demand.value {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "demand.value must be a non-negative number, got {value}"
                )));
            }
        }
        for (requirement, rate) in self.rate_overrides.entries() {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "rate override for `{requirement}` must be positive, got {rate}"
                )));
            }
        }
        Ok(())
    }

    /// Sets the solver time limit; `0` searches to completion.
    pub fn with_time_limit_secs(mut self, seconds: u64) -> Self {
        self.solver.time_limit_secs = Some(seconds);
        self
    }

    /// Sets the node limit of the branch-and-bound search.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.solver.node_limit = Some(nodes);
        self
    }

    /// Sets a demand that bypasses the demand source.
    pub fn with_demand(mut self, demand: f64) -> Self {
        self.demand.value = Some(demand);
        self
    }

    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.demand.horizon = horizon;
        self
    }

    pub fn with_repair_cost(mut self, mode: RepairCostMode) -> Self {
        self.objective.repair_cost = mode;
        self
    }

    pub fn with_rate_override(mut self, requirement: RequirementRef, rate: f64) -> Self {
        self.rate_overrides.set(requirement, rate);
        self
    }

    /// Returns the solver time limit, or `None` when the search may run to
    /// completion.
    pub fn time_limit(&self) -> Option<Duration> {
        self.solver
            .time_limit_secs
            .filter(|&seconds| seconds > 0)
            .map(Duration::from_secs)
    }

    pub fn formulation_options(&self) -> FormulationOptions {
        FormulationOptions::default().with_repair_cost(self.objective.repair_cost)
    }
}

/// Budget and tolerances for the branch-and-bound solver.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverSettings {
    /// Wall-clock limit in seconds. `0` (or `None` from code) searches to
    /// completion; file formats without a null use `0`.
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: Option<u64>,

    /// Maximum number of search nodes.
    #[serde(default)]
    pub node_limit: Option<u64>,

    /// Nodes whose bound is within this of the incumbent are pruned.
    #[serde(default = "default_absolute_gap")]
    pub absolute_gap: f64,

    /// Distance from an integer below which a value counts as integral.
    #[serde(default = "default_integrality_tolerance")]
    pub integrality_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit_secs(),
            node_limit: None,
            absolute_gap: default_absolute_gap(),
            integrality_tolerance: default_integrality_tolerance(),
        }
    }
}

fn default_time_limit_secs() -> Option<u64> {
    Some(30)
}

fn default_absolute_gap() -> f64 {
    1e-6
}

fn default_integrality_tolerance() -> f64 {
    1e-6
}

/// Where the bed demand comes from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DemandSettings {
    /// Fixed demand; when set the demand source is never consulted.
    #[serde(default)]
    pub value: Option<f64>,

    /// Forecast horizon in days handed to the demand source.
    #[serde(default = "default_horizon")]
    pub horizon: u32,
}

impl Default for DemandSettings {
    fn default() -> Self {
        Self {
            value: None,
            horizon: default_horizon(),
        }
    }
}

fn default_horizon() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ObjectiveSettings {
    #[serde(default)]
    pub repair_cost: RepairCostMode,
}
