//! Dashboard configuration file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetConfig;
use crate::error::CrimeMapError;
use crate::options::ViewOptions;

/// Everything that stays fixed for a session, as read from a JSON file.
///
/// Every field is optional in the file; missing ones take their defaults.
///
/// ```json
/// {
///   "data": {
///     "incidents": "data/incidents.csv",
///     "boundaries": "data/boroughs.geojson",
///     "columns": { "area": "alcaldia_hecho", "label": null }
///   },
///   "view": { "size": { "width": 1024, "height": 768 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Data sources.
    pub data: DatasetConfig,
    /// Render settings.
    pub view: ViewOptions,
}

impl DashboardConfig {
    /// Reads the configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CrimeMapError> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::debug!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Parses the configuration from a JSON string.
    ///
    /// Out of range view settings are rejected here rather than at render time.
    pub fn from_json(json: &str) -> Result<Self, CrimeMapError> {
        let config: Self = serde_json::from_str(json)?;
        config.view.validate()?;

        Ok(config)
    }
}
