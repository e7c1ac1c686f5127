use serde_json::json;

use super::export::GeoJsonExporter;
use super::MapRenderer;
use crate::error::CrimeMapError;
use crate::map::MapArtifact;

const LEAFLET_VERSION: &str = "1.9.4";
const LEAFLET_HEAT_VERSION: &str = "0.2.0";

const PAGE_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{title}}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{{leaflet}}/dist/leaflet.css" />
  <script src="https://unpkg.com/leaflet@{{leaflet}}/dist/leaflet.js"></script>
  <script src="https://unpkg.com/leaflet.heat@{{leaflet_heat}}/dist/leaflet-heat.js"></script>
  <style>
    body { font-family: sans-serif; margin: 16px; }
    #map { width: {{width}}px; height: {{height}}px; }
  </style>
</head>
<body>
  <h1>{{title}}</h1>
  <div id="map"></div>
  <script>
    const data = {{data}};
    const text = (value) => {
      const el = document.createElement("span");
      el.textContent = value;
      return el;
    };

    const map = L.map("map").setView(data.center, data.zoom);
    L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
      maxZoom: 19,
      attribution: "&copy; OpenStreetMap contributors",
    }).addTo(map);

    L.geoJSON(data.boundaries, {
      style: (feature) => feature.properties.highlighted
        ? { color: "#2166ac", weight: 3, fillOpacity: 0.1 }
        : { color: "#555555", weight: 1, fillOpacity: 0.02 },
      onEachFeature: (feature, layer) => {
        if (feature.properties.name) {
          layer.bindTooltip(text(feature.properties.name));
        }
      },
    }).addTo(map);

    if (data.heat) {
      L.heatLayer(data.heat, { radius: 25, blur: 15, maxZoom: 17 }).addTo(map);
    }

    if (data.markers) {
      const markers = L.layerGroup();
      for (const [lat, lon, label] of data.markers) {
        const marker = L.circleMarker([lat, lon], {
          radius: 4,
          color: "#d7301f",
          weight: 1,
          fillOpacity: 0.8,
        });
        if (label) {
          marker.bindPopup(text(label));
        }
        marker.addTo(markers);
      }
      markers.addTo(map);
    }
  </script>
</body>
</html>
"##;

/// Renders a standalone HTML page showing the map with Leaflet.
///
/// The page pulls Leaflet, `leaflet.heat` and OpenStreetMap tiles from the network when opened.
/// Map data is embedded inline, so the file can be shared without the source data.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl MapRenderer for HtmlRenderer {
    type Output = String;

    fn render(&self, map: &MapArtifact<'_>) -> Result<String, CrimeMapError> {
        let markers = map.markers.as_ref().map(|markers| {
            markers
                .iter()
                .map(|marker| json!([marker.position.lat(), marker.position.lon(), marker.label]))
                .collect::<Vec<_>>()
        });

        // leaflet.heat expects intensities in 0..=1.
        let heat = map.heatmap.as_ref().map(|layer| {
            let max = f64::from(layer.max_weight().max(1));
            layer
                .cells()
                .iter()
                .map(|cell| {
                    json!([
                        cell.center.lat(),
                        cell.center.lon(),
                        f64::from(cell.weight) / max
                    ])
                })
                .collect::<Vec<_>>()
        });

        let data = json!({
            "center": [map.view.center.lat(), map.view.center.lon()],
            "zoom": map.view.zoom,
            "boundaries": GeoJsonExporter::boundaries(map),
            "markers": markers,
            "heat": heat,
        });

        let page = PAGE_TEMPLATE
            .replace("{{title}}", &escape_html(&map.title))
            .replace("{{leaflet}}", LEAFLET_VERSION)
            .replace("{{leaflet_heat}}", LEAFLET_HEAT_VERSION)
            .replace("{{width}}", &map.view.size.width().to_string())
            .replace("{{height}}", &map.view.size.height().to_string())
            .replace("{{data}}", &script_safe_json(&data)?);

        Ok(page)
    }
}

/// Serializes JSON so it cannot close the surrounding `<script>` element.
fn script_safe_json(value: &serde_json::Value) -> Result<String, CrimeMapError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
