use geojson::{Feature, FeatureCollection, Geometry, Value};

use super::MapRenderer;
use crate::boundary::{Polygon, Ring};
use crate::error::CrimeMapError;
use crate::map::{BoundaryShape, MapArtifact};

/// Exports every layer of the map as GeoJSON features.
///
/// Each feature carries a `layer` property: `boundary`, `marker` or `heat`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonExporter;

impl GeoJsonExporter {
    /// Boundary layer only, with `name` and `highlighted` properties.
    pub fn boundaries(map: &MapArtifact<'_>) -> FeatureCollection {
        map.boundaries.iter().map(boundary_feature).collect()
    }
}

impl MapRenderer for GeoJsonExporter {
    type Output = FeatureCollection;

    fn render(&self, map: &MapArtifact<'_>) -> Result<Self::Output, CrimeMapError> {
        let mut features: Vec<Feature> = map.boundaries.iter().map(boundary_feature).collect();

        for marker in map.markers.iter().flatten() {
            let mut feature = point_feature(marker.position.lon(), marker.position.lat());
            feature.set_property("layer", "marker");
            if let Some(label) = marker.label {
                feature.set_property("label", label);
            }
            features.push(feature);
        }

        for cell in map.heatmap.iter().flat_map(|layer| layer.cells()) {
            let mut feature = point_feature(cell.center.lon(), cell.center.lat());
            feature.set_property("layer", "heat");
            feature.set_property("weight", cell.weight);
            features.push(feature);
        }

        Ok(features.into_iter().collect())
    }
}

fn boundary_feature(shape: &BoundaryShape<'_>) -> Feature {
    let polygons: Vec<Vec<Vec<Vec<f64>>>> =
        shape.boundary.polygons().iter().map(polygon_rings).collect();

    let value = match <[_; 1]>::try_from(polygons) {
        Ok([single]) => Value::Polygon(single),
        Err(polygons) => Value::MultiPolygon(polygons),
    };

    let mut feature = Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: None,
        foreign_members: None,
    };
    feature.set_property("layer", "boundary");
    feature.set_property("name", shape.boundary.name());
    feature.set_property("highlighted", shape.highlighted);

    feature
}

fn point_feature(lon: f64, lat: f64) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
        id: None,
        properties: None,
        foreign_members: None,
    }
}

fn polygon_rings(polygon: &Polygon) -> Vec<Vec<Vec<f64>>> {
    polygon.rings().map(ring_positions).collect()
}

fn ring_positions(ring: &Ring) -> Vec<Vec<f64>> {
    ring.iter().map(|p| vec![p.lon(), p.lat()]).collect()
}
