//! Geographic coordinates in degrees (WGS84).

/// Point on the Earth surface given by latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Creates a point without any validation.
    pub const fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Creates a point if both values are finite and inside the valid degree ranges.
    ///
    /// ```
    /// use crimemap_types::GeoPoint;
    ///
    /// assert!(GeoPoint::try_latlon(19.4, -99.1).is_some());
    /// assert!(GeoPoint::try_latlon(f64::NAN, -99.1).is_none());
    /// assert!(GeoPoint::try_latlon(91.0, 0.0).is_none());
    /// ```
    pub fn try_latlon(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);

        valid.then_some(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Axis-aligned bounding box in geographic coordinates.
///
/// Boxes crossing the antimeridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoBbox {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl GeoBbox {
    /// Creates a new box. Bounds are reordered if given in the wrong order.
    pub fn new(lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64) -> Self {
        Self {
            lat_min: lat_min.min(lat_max),
            lat_max: lat_min.max(lat_max),
            lon_min: lon_min.min(lon_max),
            lon_max: lon_min.max(lon_max),
        }
    }

    /// Degenerate box covering a single point.
    pub fn from_point(point: GeoPoint) -> Self {
        Self {
            lat_min: point.lat(),
            lat_max: point.lat(),
            lon_min: point.lon(),
            lon_max: point.lon(),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |bbox, point| {
            bbox.extended(point)
        }))
    }

    /// Returns a box that also contains the given point.
    pub fn extended(self, point: GeoPoint) -> Self {
        Self {
            lat_min: self.lat_min.min(point.lat()),
            lat_max: self.lat_max.max(point.lat()),
            lon_min: self.lon_min.min(point.lon()),
            lon_max: self.lon_max.max(point.lon()),
        }
    }

    /// Returns the union of two boxes.
    pub fn merge(self, other: Self) -> Self {
        Self {
            lat_min: self.lat_min.min(other.lat_min),
            lat_max: self.lat_max.max(other.lat_max),
            lon_min: self.lon_min.min(other.lon_min),
            lon_max: self.lon_max.max(other.lon_max),
        }
    }

    /// Center of the box.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::latlon(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// South-west corner.
    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::latlon(self.lat_min, self.lon_min)
    }

    /// North-east corner.
    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::latlon(self.lat_max, self.lon_max)
    }

    /// Returns true if the point lies inside the box or on its border.
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.lat_min..=self.lat_max).contains(&point.lat())
            && (self.lon_min..=self.lon_max).contains(&point.lon())
    }

    /// Minimum latitude.
    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    /// Maximum latitude.
    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    /// Minimum longitude.
    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    /// Maximum longitude.
    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn bbox_from_points() {
        let bbox = GeoBbox::from_points([
            GeoPoint::latlon(19.4, -99.1),
            GeoPoint::latlon(19.2, -99.3),
            GeoPoint::latlon(19.5, -99.0),
        ])
        .expect("non-empty");

        assert_abs_diff_eq!(bbox.lat_min(), 19.2);
        assert_abs_diff_eq!(bbox.lat_max(), 19.5);
        assert_abs_diff_eq!(bbox.lon_min(), -99.3);
        assert_abs_diff_eq!(bbox.lon_max(), -99.0);

        let center = bbox.center();
        assert_abs_diff_eq!(center.lat(), 19.35, epsilon = 1e-9);
        assert_abs_diff_eq!(center.lon(), -99.15, epsilon = 1e-9);
    }

    #[test]
    fn bbox_from_no_points() {
        assert!(GeoBbox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn merge_and_contains() {
        let a = GeoBbox::new(0.0, 0.0, 1.0, 1.0);
        let b = GeoBbox::new(2.0, -1.0, 3.0, 0.5);
        let merged = a.merge(b);

        assert!(merged.contains(GeoPoint::latlon(2.5, 0.9)));
        assert!(!a.contains(GeoPoint::latlon(2.5, 0.9)));
        assert_eq!(merged.south_west(), GeoPoint::latlon(0.0, -1.0));
        assert_eq!(merged.north_east(), GeoPoint::latlon(3.0, 1.0));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::try_latlon(0.0, 180.5).is_none());
        assert!(GeoPoint::try_latlon(-90.5, 0.0).is_none());
        assert!(GeoPoint::try_latlon(0.0, f64::INFINITY).is_none());
        assert!(GeoPoint::try_latlon(-90.0, 180.0).is_some());
    }
}
