//! Crime incident map.
//!
//! Loads a table of incidents and the administrative boundaries of a city once, and turns a
//! user [`ViewSelection`] into a [`MapArtifact`] on every interaction:
//!
//! 1. [`filter`] keeps the incidents of the selected area,
//! 2. [`sample`] caps their number with a fixed-seed random subset,
//! 3. [`compose_map`] lays boundaries, markers and a density layer into a map.
//!
//! [`render_view`] chains the three stages. It is pure, so the pipeline can be tested without
//! any UI. Renderers in [`render`] turn the artifact into HTML, PNG or GeoJSON.
//!
//! ```no_run
//! use crimemap::render::{HtmlRenderer, MapRenderer};
//! use crimemap::{DatasetCache, DatasetConfig, ViewOptions, ViewSelection};
//!
//! let cache = DatasetCache::new(DatasetConfig::default());
//! let dataset = cache.get()?;
//! let map = dataset.render(&ViewSelection::default(), &ViewOptions::default());
//! std::fs::write("map.html", HtmlRenderer.render(&map)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod boundary;
pub mod config;
pub mod dataset;
pub mod error;
pub mod map;
pub mod options;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod selection;

pub use boundary::{Boundary, BoundaryCollection};
pub use config::DashboardConfig;
pub use crimemap_types;
pub use dataset::{Dataset, DatasetCache, DatasetConfig};
pub use error::CrimeMapError;
pub use map::{compose_map, MapArtifact, MapView};
pub use options::ViewOptions;
pub use pipeline::{filter, render_view, sample, sample_with_seed, SAMPLE_SEED};
pub use record::{ColumnMapping, IncidentRecord, IncidentSet};
pub use selection::{AreaFilter, LayerSet, SampleCap, ViewSelection, ALL_AREAS};
