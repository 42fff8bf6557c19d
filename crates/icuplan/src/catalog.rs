//! File-backed catalog provider.

use std::path::{Path, PathBuf};

use icuplan_core::{Catalog, CatalogProvider, PlanningError, TransferCostTable};
use serde::Deserialize;
use tracing::debug;

/// Serialization format of a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Yaml,
    Json,
}

impl CatalogFormat {
    /// Picks the format from the file extension, defaulting to TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => CatalogFormat::Yaml,
            Some("json") => CatalogFormat::Json,
            _ => CatalogFormat::Toml,
        }
    }
}

/// On-disk layout: a [`Catalog`] plus an optional reference to a
/// plain-text transfer cost file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(flatten)]
    catalog: Catalog,

    /// Resolved against the catalog file's directory.
    #[serde(default)]
    transfer_costs_file: Option<PathBuf>,
}

/// Reads a catalog snapshot from a TOML, YAML or JSON file on every call.
///
/// When the file names a `transfer_costs_file`, that file is parsed as
/// requirement-major blocks of whitespace-separated costs, one line per
/// source facility, and replaces the inline table.
///
/// # Examples
///
/// ```no_run
/// use icuplan::{CatalogProvider, FileCatalog};
///
/// let catalog = FileCatalog::new("network.toml").catalog().unwrap();
/// println!("{} facilities", catalog.facilities.len());
/// ```
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses catalog text in the given format, resolving a referenced
    /// transfer cost file against `base_dir`.
    pub fn parse(
        text: &str,
        format: CatalogFormat,
        base_dir: &Path,
    ) -> Result<Catalog, PlanningError> {
        let file: CatalogFile = match format {
            CatalogFormat::Toml => toml::from_str(text).map_err(|e| catalog_error("TOML", e))?,
            CatalogFormat::Yaml => {
                serde_yaml::from_str(text).map_err(|e| catalog_error("YAML", e))?
            }
            CatalogFormat::Json => {
                serde_json::from_str(text).map_err(|e| catalog_error("JSON", e))?
            }
        };

        let mut catalog = file.catalog;
        if let Some(relative) = file.transfer_costs_file {
            if !catalog.transfer_costs.is_empty() {
                return Err(PlanningError::Catalog(
                    "transfer costs given both inline and as transfer_costs_file".to_string(),
                ));
            }
            let path = base_dir.join(relative);
            let text = std::fs::read_to_string(&path)
                .map_err(|e| PlanningError::Catalog(format!("{}: {e}", path.display())))?;
            catalog.transfer_costs = TransferCostTable::parse_text(
                &text,
                catalog.requirement_count(),
                catalog.facilities.len(),
            )?;
            debug!(
                event = "transfer_costs_loaded",
                path = %path.display(),
                requirements = catalog.requirement_count(),
                facilities = catalog.facilities.len(),
            );
        }
        Ok(catalog)
    }
}

impl CatalogProvider for FileCatalog {
    fn catalog(&self) -> Result<Catalog, PlanningError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| PlanningError::Catalog(format!("{}: {e}", self.path.display())))?;
        let base_dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&text, CatalogFormat::from_path(&self.path), base_dir)
    }
}

fn catalog_error(format: &str, error: impl std::fmt::Display) -> PlanningError {
    PlanningError::Catalog(format!("{format} parse error: {error}"))
}
