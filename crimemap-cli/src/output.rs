use std::io::Write;
use std::path::Path;

use anyhow::Context;
use crimemap::render::{GeoJsonExporter, HtmlRenderer, MapRenderer};
#[cfg(feature = "raster")]
use crimemap::render::{encode_png, RasterRenderer};
use crimemap::MapArtifact;

use crate::args::OutputFormat;

/// Renders the map in the given format.
pub fn encode(map: &MapArtifact<'_>, format: OutputFormat) -> anyhow::Result<Vec<u8>> {
    let bytes = match format {
        OutputFormat::Html => HtmlRenderer.render(map)?.into_bytes(),
        #[cfg(feature = "raster")]
        OutputFormat::Png => encode_png(&RasterRenderer::default().render(map)?)?,
        #[cfg(not(feature = "raster"))]
        OutputFormat::Png => anyhow::bail!("PNG output needs the `raster` feature"),
        OutputFormat::Geojson => serde_json::to_vec_pretty(&GeoJsonExporter.render(map)?)?,
    };

    Ok(bytes)
}

/// Renders the map and writes it to `output`, or to stdout when no path is given.
pub fn write_map(
    map: &MapArtifact<'_>,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let bytes = encode(map, format)?;

    match output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!(
                "Wrote {} bytes to {} ({} markers, {} density cells)",
                bytes.len(),
                path.display(),
                map.marker_count(),
                map.density_cell_count()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
