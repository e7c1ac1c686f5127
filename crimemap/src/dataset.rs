//! Session data: the incident table and the boundaries, loaded once and shared.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::boundary::{BoundaryCollection, DEFAULT_NAME_PROPERTY};
use crate::error::CrimeMapError;
use crate::map::MapArtifact;
use crate::options::ViewOptions;
use crate::pipeline::render_view;
use crate::record::{ColumnMapping, IncidentSet};
use crate::selection::ViewSelection;

/// Where the session data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Incident table (CSV with header row).
    pub incidents: PathBuf,
    /// Boundary polygons (GeoJSON).
    pub boundaries: PathBuf,
    /// Incident table column names.
    pub columns: ColumnMapping,
    /// Feature property holding the boundary area name.
    pub boundary_name_property: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            incidents: PathBuf::from("df_streamlit.csv"),
            boundaries: PathBuf::from("catalogo-de-colonias.json"),
            columns: ColumnMapping::default(),
            boundary_name_property: DEFAULT_NAME_PROPERTY.to_string(),
        }
    }
}

/// Incident records and boundaries of a session.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Incident table.
    pub incidents: IncidentSet,
    /// Boundary polygons.
    pub boundaries: BoundaryCollection,
}

impl Dataset {
    /// Creates a dataset from already loaded parts.
    pub fn new(incidents: IncidentSet, boundaries: BoundaryCollection) -> Self {
        Self {
            incidents,
            boundaries,
        }
    }

    /// Loads both sources. Either one failing fails the whole load.
    pub fn load(config: &DatasetConfig) -> Result<Self, CrimeMapError> {
        let boundaries =
            BoundaryCollection::from_path(&config.boundaries, &config.boundary_name_property)?;
        let incidents = IncidentSet::from_path(&config.incidents, &config.columns)?;

        Ok(Self {
            incidents,
            boundaries,
        })
    }

    /// Options of the area selector.
    pub fn area_options(&self) -> Vec<String> {
        self.incidents.area_options()
    }

    /// Runs the render pipeline over this dataset.
    pub fn render(&self, selection: &ViewSelection, options: &ViewOptions) -> MapArtifact<'_> {
        render_view(&self.incidents, &self.boundaries, selection, options)
    }
}

/// Loads the dataset on first use and hands out the same copy afterwards.
///
/// Reloading on every render gives the same result, the cache only saves the I/O.
pub struct DatasetCache {
    config: DatasetConfig,
    cached: Mutex<Option<Arc<Dataset>>>,
}

impl DatasetCache {
    /// Creates an empty cache. Nothing is read until [`DatasetCache::get`] is called.
    pub fn new(config: DatasetConfig) -> Self {
        Self {
            config,
            cached: Mutex::new(None),
        }
    }

    /// Creates a cache already holding the given dataset.
    pub fn with_dataset(config: DatasetConfig, dataset: Dataset) -> Self {
        Self {
            config,
            cached: Mutex::new(Some(Arc::new(dataset))),
        }
    }

    /// Returns the cached dataset, loading it first if needed.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn get(&self) -> Result<Arc<Dataset>, CrimeMapError> {
        let mut cached = self.cached.lock();
        if let Some(dataset) = cached.as_ref() {
            log::trace!("Dataset cache hit");
            return Ok(dataset.clone());
        }

        log::debug!("Dataset cache miss, loading from disk");
        let dataset = Arc::new(Dataset::load(&self.config)?);
        *cached = Some(dataset.clone());

        Ok(dataset)
    }

    /// True if a dataset is currently held.
    pub fn is_loaded(&self) -> bool {
        self.cached.lock().is_some()
    }

    /// Drops the cached dataset so the next [`DatasetCache::get`] reloads it.
    pub fn invalidate(&self) {
        self.cached.lock().take();
    }

    /// Source configuration.
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_files() -> DatasetConfig {
        DatasetConfig {
            incidents: PathBuf::from("/nonexistent/incidents.csv"),
            boundaries: PathBuf::from("/nonexistent/boundaries.json"),
            ..Default::default()
        }
    }

    #[test]
    fn cache_returns_same_instance() {
        let cache = DatasetCache::with_dataset(missing_files(), Dataset::default());
        let first = cache.get().expect("preloaded");
        let second = cache.get().expect("preloaded");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache = DatasetCache::new(missing_files());
        assert!(matches!(cache.get(), Err(CrimeMapError::Io(_))));
        assert!(!cache.is_loaded());
    }

    #[test]
    fn invalidate_drops_dataset() {
        let cache = DatasetCache::with_dataset(missing_files(), Dataset::default());
        assert!(cache.is_loaded());
        cache.invalidate();
        assert!(!cache.is_loaded());
        assert!(cache.get().is_err());
    }
}
