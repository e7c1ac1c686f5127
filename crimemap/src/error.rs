//! Error type of the crate.

use thiserror::Error;

/// Error that can occur while loading data or rendering a map.
///
/// Only configuration, data acquisition and output can fail. Filtering, sampling and map
/// composition are infallible: bad coordinates are skipped and empty selections produce
/// boundary-only maps.
#[derive(Debug, Error)]
pub enum CrimeMapError {
    /// Failed to read or write a file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The incident table is not a valid CSV document.
    #[error("malformed incident table: {0}")]
    Csv(#[from] csv::Error),

    /// The incident table lacks a required column.
    #[error("incident table has no '{0}' column")]
    MissingColumn(String),

    /// The boundary file is not valid GeoJSON.
    #[error("malformed boundary file: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The boundary file is valid GeoJSON but contains no usable polygons.
    #[error("invalid boundary collection: {0}")]
    InvalidBoundaries(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to serialize or parse a JSON value.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Failed to encode a raster image.
    #[cfg(feature = "raster")]
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
