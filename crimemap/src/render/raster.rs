use crimemap_types::{mercator, GeoPoint, Point2};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, Blend};

use super::MapRenderer;
use crate::error::CrimeMapError;
use crate::map::{HeatmapLayer, MapArtifact, MapView};

/// Software renderer producing an RGBA image of the map.
///
/// Draws, bottom to top: background, density blobs, boundary outlines, markers. There is no
/// base map, so the output works offline.
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    /// Fill color of the image.
    pub background: Rgba<u8>,
    /// Outline color of regular boundaries.
    pub boundary_color: Rgba<u8>,
    /// Outline color of the selected area.
    pub highlight_color: Rgba<u8>,
    /// Fill color of markers.
    pub marker_color: Rgba<u8>,
    /// Marker radius in pixels.
    pub marker_radius: u32,
    /// Radius of a density blob in pixels.
    pub heat_radius: u32,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self {
            background: Rgba([242, 239, 233, 255]),
            boundary_color: Rgba([85, 85, 85, 255]),
            highlight_color: Rgba([33, 102, 172, 255]),
            marker_color: Rgba([215, 48, 31, 255]),
            marker_radius: 3,
            heat_radius: 14,
        }
    }
}

impl MapRenderer for RasterRenderer {
    type Output = RgbaImage;

    fn render(&self, map: &MapArtifact<'_>) -> Result<RgbaImage, CrimeMapError> {
        let view = map.view;
        let image = RgbaImage::from_pixel(view.size.width(), view.size.height(), self.background);

        let mut image = match &map.heatmap {
            Some(layer) => self.draw_heatmap(image, &view, layer),
            None => image,
        };

        // Selected area goes last so its outline stays on top of its neighbours.
        let regular = map.boundaries.iter().filter(|shape| !shape.highlighted);
        let highlighted = map.boundaries.iter().filter(|shape| shape.highlighted);
        for (shape, color, width) in regular
            .map(|shape| (shape, self.boundary_color, 1))
            .chain(highlighted.map(|shape| (shape, self.highlight_color, 3)))
        {
            for ring in shape.boundary.polygons().iter().flat_map(|p| p.rings()) {
                let points: Vec<(f32, f32)> =
                    ring.iter().map(|p| screen(&view, *p)).collect();
                draw_polyline(&mut image, &points, color, width);
            }
        }

        let radius = self.marker_radius.min(i32::MAX as u32) as i32;
        for marker in map.markers.iter().flatten() {
            let (x, y) = screen(&view, marker.position);
            draw_filled_circle_mut(
                &mut image,
                (x.round() as i32, y.round() as i32),
                radius,
                self.marker_color,
            );
        }

        Ok(image)
    }
}

impl RasterRenderer {
    /// Each density cell becomes a stack of translucent concentric discs, so the blob fades
    /// towards its rim.
    fn draw_heatmap(&self, image: RgbaImage, view: &MapView, layer: &HeatmapLayer) -> RgbaImage {
        const RINGS: u32 = 4;

        let max = f64::from(layer.max_weight().max(1));
        let radius = self.heat_radius.clamp(1, i32::MAX as u32) as i32;
        let mut canvas = Blend(image);

        for cell in layer.cells() {
            let intensity = f64::from(cell.weight) / max;
            let [r, g, b] = heat_color(intensity);
            let alpha = (0.65 * (0.35 + 0.65 * intensity) / f64::from(RINGS) * 255.0).round() as u8;
            let (x, y) = screen(view, cell.center);
            let center = (x.round() as i32, y.round() as i32);

            for ring in 0..RINGS {
                let ring_radius = (radius * (RINGS - ring) as i32 / RINGS as i32).max(1);
                draw_filled_circle_mut(&mut canvas, center, ring_radius, Rgba([r, g, b, alpha]));
            }
        }

        canvas.0
    }
}

/// Encodes an image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CrimeMapError> {
    let mut bytes = vec![];
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;

    Ok(bytes)
}

/// Blue to yellow to red ramp for intensity in `0..=1`.
fn heat_color(intensity: f64) -> [u8; 3] {
    const STOPS: [(f64, [f64; 3]); 3] = [
        (0.0, [49.0, 54.0, 149.0]),
        (0.5, [254.0, 224.0, 144.0]),
        (1.0, [215.0, 48.0, 39.0]),
    ];

    let t = intensity.clamp(0.0, 1.0);
    let (lo, hi) = if t <= STOPS[1].0 {
        (STOPS[0], STOPS[1])
    } else {
        (STOPS[1], STOPS[2])
    };
    let k = (t - lo.0) / (hi.0 - lo.0);

    std::array::from_fn(|i| (lo.1[i] + (hi.1[i] - lo.1[i]) * k).round() as u8)
}

fn screen(view: &MapView, point: GeoPoint) -> (f32, f32) {
    let Point2 { x, y } = mercator::to_screen(point, view.center, view.zoom, view.size);
    (x as f32, y as f32)
}

/// Draws connected segments. Widths above one are drawn as parallel copies offset by whole
/// pixels. Pixels outside the image are dropped by `draw_line_segment_mut`.
fn draw_polyline(image: &mut RgbaImage, points: &[(f32, f32)], color: Rgba<u8>, width: u32) {
    let half = (width.max(1) / 2).min(i32::MAX as u32) as i32;
    for dy in -half..=half {
        for dx in -half..=half {
            let (dx, dy) = (dx as f32, dy as f32);
            for segment in points.windows(2) {
                let (x0, y0) = segment[0];
                let (x1, y1) = segment[1];
                draw_line_segment_mut(image, (x0 + dx, y0 + dy), (x1 + dx, y1 + dy), color);
            }
        }
    }
}
