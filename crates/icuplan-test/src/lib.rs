//! Shared test fixtures for icuplan crates.
//!
//! Each fixture is a small hospital network with a known optimal plan:
//!
//! - [`scenario_a`] - one built facility whose stock already covers demand
//! - [`scenario_b`] - a starved facility supplied by transfer, not purchase
//! - [`scenario_c`] - demand above every bed ceiling combined
//! - [`scenario_d`] - a repairable item with nothing broken anywhere
//! - [`repair_mix`] - broken units cheaper to repair than to replace
//! - [`regional_network`] - ten facilities and four requirement types
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! icuplan-test = { workspace = true }
//! ```

pub mod scenario;

pub use scenario::{
    catalog, regional_network, repair_mix, scenario_a, scenario_b, scenario_c, scenario_d,
    Scenario,
};
