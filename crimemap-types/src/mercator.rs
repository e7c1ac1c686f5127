//! Spherical Web Mercator (EPSG:3857) in normalized world units.
//!
//! World coordinates are in the `[0, 1]` range on both axes with the origin in the north-west
//! corner, so a point at zoom level `z` lands on pixel `world * TILE_SIZE * 2^z`.

use crate::cartesian::{Point2, Size};
use crate::geo::{GeoBbox, GeoPoint};

/// Size of a single map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Projects a geographic point into normalized world coordinates.
pub fn project(point: GeoPoint) -> Point2 {
    let lat = point.lat().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (point.lon() + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0;

    Point2::new(x, y)
}

/// Inverse of [`project`].
pub fn unproject(point: Point2) -> GeoPoint {
    let lon = point.x * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * point.y);
    let lat = n.sinh().atan().to_degrees();

    GeoPoint::latlon(lat, lon)
}

/// Number of pixels the whole world spans at the given zoom level.
pub fn world_size_px(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom.min(30))
}

/// Pixel position of `point` on a surface of `size` centered on `center` at `zoom`.
pub fn to_screen(point: GeoPoint, center: GeoPoint, zoom: u8, size: Size) -> Point2 {
    let scale = world_size_px(zoom);
    let p = project(point);
    let c = project(center);

    Point2::new(
        (p.x - c.x) * scale + f64::from(size.width()) / 2.0,
        (p.y - c.y) * scale + f64::from(size.height()) / 2.0,
    )
}

/// Largest zoom level in `min_zoom..=max_zoom` at which `bbox` fits into `size`.
///
/// A degenerate box (single point) gets `max_zoom`. Swapped bounds are put back in order.
pub fn zoom_to_fit(bbox: &GeoBbox, size: Size, min_zoom: u8, max_zoom: u8) -> u8 {
    if size.is_empty() {
        return min_zoom;
    }

    let sw = project(bbox.south_west());
    let ne = project(bbox.north_east());
    let dx = (ne.x - sw.x).abs();
    let dy = (ne.y - sw.y).abs();

    let fit = |span: f64, px: u32| -> f64 {
        if span <= f64::EPSILON {
            f64::INFINITY
        } else {
            (f64::from(px) / (span * TILE_SIZE)).log2()
        }
    };

    let (min_zoom, max_zoom) = (min_zoom.min(max_zoom), min_zoom.max(max_zoom));
    let zoom = fit(dx, size.width()).min(fit(dy, size.height()));
    if zoom.is_infinite() {
        return max_zoom;
    }

    zoom.floor().clamp(f64::from(min_zoom), f64::from(max_zoom)) as u8
}
