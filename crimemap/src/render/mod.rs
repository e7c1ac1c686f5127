//! Output backends for a composed [`MapArtifact`].
//!
//! The core pipeline ends at the artifact; everything here only turns it into something a user
//! can look at:
//! * [`HtmlRenderer`] produces an interactive Leaflet page.
//! * [`RasterRenderer`] draws a PNG-ready image without any external service.
//! * [`GeoJsonExporter`] dumps the layers as a GeoJSON feature collection.

use crate::error::CrimeMapError;
use crate::map::MapArtifact;

mod export;
mod html;
#[cfg(feature = "raster")]
mod raster;

pub use export::GeoJsonExporter;
pub use html::HtmlRenderer;
#[cfg(feature = "raster")]
pub use raster::{encode_png, RasterRenderer};

/// Converts a composed map into a displayable artifact.
pub trait MapRenderer {
    /// Rendered result.
    type Output;

    /// Renders the map.
    fn render(&self, map: &MapArtifact<'_>) -> Result<Self::Output, CrimeMapError>;
}
