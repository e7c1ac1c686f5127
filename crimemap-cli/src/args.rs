use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crimemap::{AreaFilter, DashboardConfig, LayerSet, SampleCap, ViewSelection, ALL_AREAS};

#[derive(Parser, Debug)]
#[command(author, version, about = "Filter, sample and map crime incidents", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "JSON configuration file")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags taking precedence over the configuration file.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    #[arg(long, global = true, help = "Incident table (CSV)")]
    pub incidents: Option<PathBuf>,

    #[arg(long, global = true, help = "Boundary polygons (GeoJSON)")]
    pub boundaries: Option<PathBuf>,

    #[arg(long, global = true, help = "Boundary feature property holding the area name")]
    pub boundary_key: Option<String>,

    #[arg(long, global = true, help = "Incident column holding the area name")]
    pub area_column: Option<String>,

    #[arg(long, global = true, help = "Incident column holding the latitude")]
    pub latitude_column: Option<String>,

    #[arg(long, global = true, help = "Incident column holding the longitude")]
    pub longitude_column: Option<String>,

    #[arg(long, global = true, help = "Incident column used as marker label")]
    pub label_column: Option<String>,

    #[arg(long, global = true, help = "Title shown above the map")]
    pub title: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the options of the area selector.
    Areas,
    /// Render one view and write it to a file or stdout.
    Render(RenderArgs),
    /// Read selection commands from stdin and re-render after each one.
    Session(SessionArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Output file, stdout if omitted")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    #[arg(short, long, help = "File rewritten after every command")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct SelectionArgs {
    #[arg(short, long, default_value = ALL_AREAS, help = "Area to show, ALL for every area")]
    pub area: String,

    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_value = "heatmap",
        help = "Overlay layers to show"
    )]
    pub layers: Vec<LayerArg>,

    #[arg(
        short,
        long,
        default_value_t = SampleCap::DEFAULT,
        help = "Maximum number of rendered incidents (100-2000, step 100)"
    )]
    pub sample_cap: usize,
}

impl SelectionArgs {
    pub fn to_selection(&self) -> ViewSelection {
        ViewSelection {
            area: AreaFilter::from_choice(&self.area),
            layers: layer_set(&self.layers),
            sample_cap: SampleCap::clamped(self.sample_cap),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerArg {
    Points,
    Heatmap,
    None,
}

pub fn layer_set(layers: &[LayerArg]) -> LayerSet {
    layers
        .iter()
        .fold(LayerSet::NONE, |mut set, layer| {
            match layer {
                LayerArg::Points => set.points = true,
                LayerArg::Heatmap => set.heatmap = true,
                LayerArg::None => {}
            }
            set
        })
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Png,
    Geojson,
}

impl Cli {
    /// Configuration file (or defaults) with the command line overrides applied.
    pub fn dashboard_config(&self) -> anyhow::Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_path(path)
                .with_context(|| format!("Failed to read configuration {}", path.display()))?,
            None => DashboardConfig::default(),
        };

        self.overrides.apply(&mut config);
        Ok(config)
    }
}

impl ConfigOverrides {
    fn apply(&self, config: &mut DashboardConfig) {
        let data = &mut config.data;
        if let Some(path) = &self.incidents {
            data.incidents = path.clone();
        }
        if let Some(path) = &self.boundaries {
            data.boundaries = path.clone();
        }
        if let Some(key) = &self.boundary_key {
            data.boundary_name_property = key.clone();
        }
        if let Some(column) = &self.area_column {
            data.columns.area = column.clone();
        }
        if let Some(column) = &self.latitude_column {
            data.columns.latitude = column.clone();
        }
        if let Some(column) = &self.longitude_column {
            data.columns.longitude = column.clone();
        }
        if let Some(column) = &self.label_column {
            data.columns.label = Some(column.clone());
        }
        if let Some(title) = &self.title {
            config.view.title = title.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("crimemap").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn render_defaults() {
        let cli = parse(&["render"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render command");
        };

        assert_eq!(args.format, OutputFormat::Html);
        assert_eq!(args.selection.to_selection(), ViewSelection::default());
    }

    #[test]
    fn layers_are_comma_separated() {
        let cli = parse(&["render", "--layers", "points,heatmap", "--area", "TLALPAN"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render command");
        };

        let selection = args.selection.to_selection();
        assert_eq!(selection.layers, LayerSet::BOTH);
        assert_eq!(selection.area, AreaFilter::Area("TLALPAN".to_string()));
    }

    #[test]
    fn sample_cap_is_snapped() {
        let cli = parse(&["render", "--sample-cap", "5000"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render command");
        };

        assert_eq!(args.selection.to_selection().sample_cap.get(), SampleCap::MAX);
    }

    #[test]
    fn overrides_win_over_defaults() {
        let cli = parse(&[
            "--incidents",
            "a.csv",
            "areas",
            "--boundary-key",
            "NOMGEO",
            "--label-column",
            "categoria_delito",
        ]);
        let config = cli.dashboard_config().expect("no config file");

        assert_eq!(config.data.incidents, Path::new("a.csv"));
        assert_eq!(config.data.boundary_name_property, "NOMGEO");
        assert_eq!(config.data.columns.label.as_deref(), Some("categoria_delito"));
        assert_eq!(config.data.columns.area, "alcaldia_hecho");
    }

    #[test]
    fn layer_none_clears_overlays() {
        assert_eq!(layer_set(&[LayerArg::None]), LayerSet::NONE);
        assert_eq!(
            layer_set(&[LayerArg::Points]),
            LayerSet {
                points: true,
                heatmap: false
            }
        );
    }

    #[test]
    fn session_requires_output() {
        assert!(Cli::try_parse_from(["crimemap", "session"]).is_err());
    }
}
