//! Map composition: turns boundaries and incident records into a [`MapArtifact`].

use crimemap_types::{mercator, GeoBbox, GeoPoint, Size};

use crate::boundary::{Boundary, BoundaryCollection};
use crate::options::ViewOptions;
use crate::record::IncidentRecord;
use crate::selection::LayerSet;

pub mod heatmap;

pub use heatmap::{HeatCell, HeatmapLayer};

/// Camera of the map: what it is centered on and how close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    /// Center of the displayed area.
    pub center: GeoPoint,
    /// Web Mercator zoom level.
    pub zoom: u8,
    /// Display size.
    pub size: Size,
}

/// Boundary drawn as the backdrop.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryShape<'a> {
    /// Geometry and name.
    pub boundary: &'a Boundary,
    /// True if this is the area the user filtered by.
    pub highlighted: bool,
}

/// Single incident marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker<'a> {
    /// Marker position.
    pub position: GeoPoint,
    /// Popup text.
    pub label: Option<&'a str>,
}

/// A composed map, ready to be handed to a [`MapRenderer`](crate::render::MapRenderer).
///
/// The artifact borrows the boundaries and record labels from the session dataset and lives
/// for a single render cycle.
#[derive(Debug, Clone)]
pub struct MapArtifact<'a> {
    /// Title shown above the map.
    pub title: String,
    /// Camera.
    pub view: MapView,
    /// Backdrop, always present.
    pub boundaries: Vec<BoundaryShape<'a>>,
    /// Marker layer, present if points were requested.
    pub markers: Option<Vec<Marker<'a>>>,
    /// Density layer, present if the heatmap was requested.
    pub heatmap: Option<HeatmapLayer>,
}

impl<'a> MapArtifact<'a> {
    /// Number of markers drawn.
    pub fn marker_count(&self) -> usize {
        self.markers.as_ref().map_or(0, Vec::len)
    }

    /// Number of non-empty density cells drawn.
    pub fn density_cell_count(&self) -> usize {
        self.heatmap.as_ref().map_or(0, HeatmapLayer::len)
    }

    /// Names of highlighted boundaries.
    pub fn highlighted_areas(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.boundaries
            .iter()
            .filter(|shape| shape.highlighted)
            .filter_map(|shape| shape.boundary.name())
    }
}

/// Builds a map from the boundaries and an already filtered and sampled record subset.
///
/// Boundaries are always included. Each overlay layer is present exactly when requested in
/// `layers`, even if it ends up empty. Records without a valid position are left out of both
/// overlays. Boundaries named `highlight` are flagged for emphasis.
pub fn compose_map<'a>(
    boundaries: &'a BoundaryCollection,
    records: &[&'a IncidentRecord],
    layers: LayerSet,
    highlight: Option<&str>,
    options: &ViewOptions,
) -> MapArtifact<'a> {
    let positioned: Vec<(GeoPoint, &'a IncidentRecord)> = records
        .iter()
        .filter_map(|&record| Some((record.position()?, record)))
        .collect();

    let skipped = records.len() - positioned.len();
    if skipped > 0 {
        log::debug!("{skipped} of {} records have no valid position", records.len());
    }

    let markers = layers.points.then(|| {
        positioned
            .iter()
            .map(|&(position, record)| Marker {
                position,
                label: record.label(),
            })
            .collect()
    });

    let heatmap = layers.heatmap.then(|| {
        HeatmapLayer::from_points(
            positioned.iter().map(|(position, _)| *position),
            options.heat_cell_size_deg,
        )
    });

    let shapes = boundaries
        .boundaries()
        .iter()
        .map(|boundary| BoundaryShape {
            boundary,
            highlighted: highlight.is_some() && boundary.name() == highlight,
        })
        .collect();

    let view = fit_view(
        boundaries,
        highlight,
        positioned.iter().map(|(position, _)| *position),
        options,
    );

    MapArtifact {
        title: options.title.clone(),
        view,
        boundaries: shapes,
        markers,
        heatmap,
    }
}

/// Chooses the camera.
///
/// Preference order: the boundaries of the selected area, the drawn incidents, all
/// boundaries, and finally the configured default center.
fn fit_view(
    boundaries: &BoundaryCollection,
    highlight: Option<&str>,
    positions: impl Iterator<Item = GeoPoint>,
    options: &ViewOptions,
) -> MapView {
    let bbox: Option<GeoBbox> = highlight
        .and_then(|name| boundaries.area_bbox(name))
        .or_else(|| GeoBbox::from_points(positions))
        .or_else(|| boundaries.bbox());

    match bbox {
        Some(bbox) => MapView {
            center: bbox.center(),
            zoom: mercator::zoom_to_fit(&bbox, options.size, options.min_zoom, options.max_zoom),
            size: options.size,
        },
        None => MapView {
            center: options.default_center,
            zoom: options.default_zoom,
            size: options.size,
        },
    }
}
