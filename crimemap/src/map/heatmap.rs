//! Density layer built by binning incident positions into a regular grid.

use std::collections::BTreeMap;

use crimemap_types::{GeoBbox, GeoPoint};

/// Default side of a density cell in degrees (about 550 m at the latitude of Mexico City).
pub const DEFAULT_CELL_SIZE_DEG: f64 = 0.005;

/// One non-empty grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    /// Center of the cell.
    pub center: GeoPoint,
    /// Number of incidents inside the cell.
    pub weight: u32,
}

/// Incident density over a latitude/longitude grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeatmapLayer {
    cell_size_deg: f64,
    cells: Vec<HeatCell>,
}

impl HeatmapLayer {
    /// Bins the points into square cells of `cell_size_deg` degrees.
    ///
    /// Cells are ordered south to north, then west to east. A non-positive or non-finite size
    /// falls back to [`DEFAULT_CELL_SIZE_DEG`].
    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>, cell_size_deg: f64) -> Self {
        let cell_size_deg = if cell_size_deg.is_finite() && cell_size_deg > 0.0 {
            cell_size_deg
        } else {
            log::warn!("Invalid heat cell size {cell_size_deg}, using {DEFAULT_CELL_SIZE_DEG}");
            DEFAULT_CELL_SIZE_DEG
        };

        let mut bins: BTreeMap<(i64, i64), u32> = BTreeMap::new();
        for point in points {
            let row = (point.lat() / cell_size_deg).floor() as i64;
            let col = (point.lon() / cell_size_deg).floor() as i64;
            *bins.entry((row, col)).or_default() += 1;
        }

        let cells = bins
            .into_iter()
            .map(|((row, col), weight)| HeatCell {
                center: GeoPoint::latlon(
                    (row as f64 + 0.5) * cell_size_deg,
                    (col as f64 + 0.5) * cell_size_deg,
                ),
                weight,
            })
            .collect();

        Self {
            cell_size_deg,
            cells,
        }
    }

    /// Non-empty cells.
    pub fn cells(&self) -> &[HeatCell] {
        &self.cells
    }

    /// Cell side in degrees.
    pub fn cell_size_deg(&self) -> f64 {
        self.cell_size_deg
    }

    /// Weight of the densest cell, 0 for an empty layer.
    pub fn max_weight(&self) -> u32 {
        self.cells.iter().map(|cell| cell.weight).max().unwrap_or(0)
    }

    /// Number of points that went into the layer.
    pub fn total_weight(&self) -> u64 {
        self.cells.iter().map(|cell| u64::from(cell.weight)).sum()
    }

    /// Bounding box of cell centers.
    pub fn bbox(&self) -> Option<GeoBbox> {
        GeoBbox::from_points(self.cells.iter().map(|cell| cell.center))
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if no point was binned.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
