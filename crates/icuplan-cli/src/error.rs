//! CLI error type and exit codes.

use std::path::PathBuf;
use std::process::ExitCode;

use icuplan::{ConfigError, PlanningError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Planning(#[from] PlanningError),

    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid option: {0}")]
    Invalid(String),
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// 2 when the network cannot meet demand, 3 when the time budget ran
    /// out, 1 for everything else.
    pub fn exit_status(&self) -> u8 {
        match self {
            CliError::Planning(PlanningError::Infeasible) => 2,
            CliError::Planning(PlanningError::TimedOut) => 3,
            _ => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}
