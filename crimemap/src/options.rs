//! Session-wide settings of the render pipeline.

use crimemap_types::{GeoPoint, Size};
use serde::{Deserialize, Serialize};

use crate::error::CrimeMapError;
use crate::map::heatmap::DEFAULT_CELL_SIZE_DEG;
use crate::pipeline::SAMPLE_SEED;

/// Center used when there is nothing to fit the view to (Mexico City Zócalo).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::latlon(19.4326, -99.1332);

/// Settings that stay fixed for a session, unlike [`ViewSelection`](crate::ViewSelection)
/// which changes with every interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Title shown above the map.
    pub title: String,
    /// Size of the displayed map.
    pub size: Size,
    /// Side of a density cell in degrees.
    pub heat_cell_size_deg: f64,
    /// Seed of the sampling generator.
    pub sample_seed: u64,
    /// Center used when no boundary or incident can be fitted.
    pub default_center: GeoPoint,
    /// Zoom used together with `default_center`.
    pub default_zoom: u8,
    /// Lower bound of the fitted zoom level.
    pub min_zoom: u8,
    /// Upper bound of the fitted zoom level.
    pub max_zoom: u8,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            title: "Crime incidents – CDMX".to_string(),
            size: Size::new(800, 600),
            heat_cell_size_deg: DEFAULT_CELL_SIZE_DEG,
            sample_seed: SAMPLE_SEED,
            default_center: DEFAULT_CENTER,
            default_zoom: 10,
            min_zoom: 1,
            max_zoom: 18,
        }
    }
}

impl ViewOptions {
    /// Checks the values a configuration file can get wrong.
    pub fn validate(&self) -> Result<(), CrimeMapError> {
        if self.min_zoom > self.max_zoom {
            return Err(CrimeMapError::InvalidConfig(format!(
                "min_zoom {} is above max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.default_zoom) {
            return Err(CrimeMapError::InvalidConfig(format!(
                "default_zoom {} is outside {}..={}",
                self.default_zoom, self.min_zoom, self.max_zoom
            )));
        }
        if self.size.is_empty() {
            return Err(CrimeMapError::InvalidConfig("map size is empty".to_string()));
        }

        Ok(())
    }
}
