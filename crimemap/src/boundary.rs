//! Administrative boundary polygons loaded from GeoJSON.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use crimemap_types::{GeoBbox, GeoPoint};
use geojson::{Feature, GeoJson, Geometry, Value};

use crate::error::CrimeMapError;

/// Default feature property holding the administrative area name.
pub const DEFAULT_NAME_PROPERTY: &str = "alc";

/// Closed ring of a polygon.
pub type Ring = Vec<GeoPoint>;

/// Polygon with an exterior ring and optional holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Ring,
    interiors: Vec<Ring>,
}

impl Polygon {
    /// Creates a polygon.
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Outer ring.
    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    /// Holes.
    pub fn interiors(&self) -> &[Ring] {
        &self.interiors
    }

    /// Iterates over all rings, exterior first.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(&self.interiors)
    }
}

/// Named administrative area geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    name: Option<String>,
    polygons: Vec<Polygon>,
}

impl Boundary {
    /// Creates a boundary.
    pub fn new(name: Option<&str>, polygons: Vec<Polygon>) -> Self {
        Self {
            name: name.map(str::to_string),
            polygons,
        }
    }

    /// Area name, if the feature has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Polygons of the area.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Bounding box of the exterior rings.
    pub fn bbox(&self) -> Option<GeoBbox> {
        GeoBbox::from_points(
            self.polygons
                .iter()
                .flat_map(|polygon| polygon.exterior().iter().copied()),
        )
    }
}

/// All boundaries of the city, used as the backdrop of every map.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCollection {
    boundaries: Vec<Boundary>,
}

impl BoundaryCollection {
    /// Creates a collection from already built boundaries.
    pub fn new(boundaries: Vec<Boundary>) -> Self {
        Self { boundaries }
    }

    /// Loads boundaries from a GeoJSON file. See [`BoundaryCollection::from_geojson`].
    pub fn from_path(path: impl AsRef<Path>, name_property: &str) -> Result<Self, CrimeMapError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let collection = Self::from_reader(file, name_property)?;
        log::info!(
            "Loaded {} boundaries from {}",
            collection.len(),
            path.display()
        );

        Ok(collection)
    }

    /// Reads a GeoJSON document. See [`BoundaryCollection::from_geojson`].
    pub fn from_reader(reader: impl Read, name_property: &str) -> Result<Self, CrimeMapError> {
        let geojson: GeoJson = std::io::read_to_string(reader)?.parse()?;
        Self::from_geojson(geojson, name_property)
    }

    /// Extracts polygon features from a GeoJSON value.
    ///
    /// A single feature or a bare geometry is treated as a collection of one. Features with
    /// non-polygon geometry are skipped. The area name is read from `name_property`, string
    /// and number values are accepted.
    ///
    /// Fails if no polygon remains, since a map without a backdrop is useless.
    pub fn from_geojson(geojson: GeoJson, name_property: &str) -> Result<Self, CrimeMapError> {
        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(geometry) => vec![Feature::from(geometry)],
        };

        let mut boundaries = vec![];
        let mut skipped = 0;
        for feature in &features {
            let name = feature_name(feature, name_property);
            let polygons = match &feature.geometry {
                Some(geometry) => convert_geometry(geometry),
                None => vec![],
            };

            if polygons.is_empty() {
                skipped += 1;
                continue;
            }

            boundaries.push(Boundary { name, polygons });
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} boundary features without polygon geometry");
        }

        if boundaries.is_empty() {
            return Err(CrimeMapError::InvalidBoundaries(format!(
                "none of {} features has polygon geometry",
                features.len()
            )));
        }

        Ok(Self { boundaries })
    }

    /// All boundaries in file order.
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Boundaries with the given name.
    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Boundary> + 'a {
        self.boundaries
            .iter()
            .filter(move |boundary| boundary.name() == Some(name))
    }

    /// Distinct names in sorted order.
    pub fn names(&self) -> BTreeSet<&str> {
        self.boundaries.iter().filter_map(Boundary::name).collect()
    }

    /// Bounding box of every boundary.
    pub fn bbox(&self) -> Option<GeoBbox> {
        merge_bboxes(self.boundaries.iter())
    }

    /// Bounding box of the boundaries with the given name.
    pub fn area_bbox(&self, name: &str) -> Option<GeoBbox> {
        merge_bboxes(self.by_name(name))
    }

    /// Number of boundaries.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// True if there are no boundaries.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

fn merge_bboxes<'a>(boundaries: impl Iterator<Item = &'a Boundary>) -> Option<GeoBbox> {
    boundaries
        .filter_map(Boundary::bbox)
        .reduce(|acc, bbox| acc.merge(bbox))
}

fn feature_name(feature: &Feature, name_property: &str) -> Option<String> {
    match feature.property(name_property)? {
        serde_json::Value::String(value) => Some(value.clone()),
        serde_json::Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn convert_geometry(geometry: &Geometry) -> Vec<Polygon> {
    match &geometry.value {
        Value::Polygon(rings) => convert_polygon(rings).into_iter().collect(),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .filter_map(|rings| convert_polygon(rings))
            .collect(),
        Value::GeometryCollection(geometries) => {
            geometries.iter().flat_map(convert_geometry).collect()
        }
        _ => vec![],
    }
}

fn convert_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon> {
    let mut rings = rings.iter().map(|ring| convert_ring(ring));
    let exterior = rings.next()?;
    if exterior.len() < 3 {
        return None;
    }

    Some(Polygon {
        exterior,
        interiors: rings.filter(|ring| ring.len() >= 3).collect(),
    })
}

fn convert_ring(positions: &[Vec<f64>]) -> Ring {
    positions
        .iter()
        .filter_map(|position| match position.as_slice() {
            [lon, lat, ..] => GeoPoint::try_latlon(*lat, *lon),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "alc": "COYOACAN", "colonia": "A" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-99.20, 19.30], [-99.10, 19.30], [-99.10, 19.35], [-99.20, 19.30]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "alc": "COYOACAN", "colonia": "B" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-99.15, 19.28], [-99.12, 19.28], [-99.12, 19.31], [-99.15, 19.28]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "alc": "IZTAPALAPA" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-99.10, 19.32], [-98.95, 19.32], [-98.95, 19.40], [-99.10, 19.32]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "alc": "MARKER" },
                "geometry": { "type": "Point", "coordinates": [-99.0, 19.0] }
            }
        ]
    }"#;

    fn load() -> BoundaryCollection {
        BoundaryCollection::from_reader(BOUNDARIES.as_bytes(), DEFAULT_NAME_PROPERTY)
            .expect("valid boundaries")
    }

    #[test]
    fn skips_non_polygon_features() {
        let collection = load();
        assert_eq!(collection.len(), 3);
        assert!(collection.by_name("MARKER").next().is_none());
    }

    #[test]
    fn groups_features_by_name() {
        let collection = load();
        assert_eq!(collection.by_name("COYOACAN").count(), 2);
        assert_eq!(
            collection.names().into_iter().collect::<Vec<_>>(),
            ["COYOACAN", "IZTAPALAPA"]
        );
    }

    #[test]
    fn area_bbox_covers_all_features_of_area() {
        let bbox = load().area_bbox("COYOACAN").expect("area exists");
        assert_abs_diff_eq!(bbox.lat_min(), 19.28);
        assert_abs_diff_eq!(bbox.lat_max(), 19.35);
        assert_abs_diff_eq!(bbox.lon_min(), -99.20);
        assert_abs_diff_eq!(bbox.lon_max(), -99.10);
    }

    #[test]
    fn unknown_area_has_no_bbox() {
        assert!(load().area_bbox("TLALPAN").is_none());
    }

    #[test]
    fn numeric_names_are_accepted() {
        let json = r#"{"type": "Feature", "properties": {"alc": 7},
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}}"#;
        let collection =
            BoundaryCollection::from_reader(json.as_bytes(), "alc").expect("valid feature");
        assert_eq!(collection.boundaries()[0].name(), Some("7"));
    }

    #[test]
    fn collection_without_polygons_is_rejected() {
        let json = r#"{"type": "FeatureCollection", "features": []}"#;
        let err = BoundaryCollection::from_reader(json.as_bytes(), "alc")
            .expect_err("nothing to draw");
        assert!(matches!(err, CrimeMapError::InvalidBoundaries(_)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = BoundaryCollection::from_reader("{not json".as_bytes(), "alc")
            .expect_err("malformed");
        assert!(matches!(err, CrimeMapError::GeoJson(_)));
    }
}
