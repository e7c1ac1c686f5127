//! Interactive session: selection commands come in line by line and every change re-runs the
//! whole pipeline against the cached dataset.

use std::io::BufRead;

use anyhow::{anyhow, bail};
use crimemap::{AreaFilter, DatasetCache, SampleCap, ViewOptions, ViewSelection};

use crate::args::{layer_set, LayerArg, SessionArgs};
use crate::output::write_map;

const HELP: &str = "\
commands:
  area <name>            select an area, ALL for every area
  layers <list|none>     comma separated: points, heatmap
  cap <n>                sample cap (100-2000, step 100)
  show                   print the current selection
  areas                  print the area options
  reload                 drop the cached dataset
  help                   print this message
  quit                   end the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Area(AreaFilter),
    Layers(Vec<LayerArg>),
    Cap(SampleCap),
    Show,
    Areas,
    Reload,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses one input line. Blank lines and `#` comments give `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "area" if !rest.is_empty() => Self::Area(AreaFilter::from_choice(rest)),
            "area" => bail!("`area` needs an area name"),
            "layers" => Self::Layers(parse_layers(rest)?),
            "cap" => {
                let value: usize = rest
                    .parse()
                    .map_err(|_| anyhow!("`cap` needs a number, got `{rest}`"))?;
                Self::Cap(SampleCap::clamped(value))
            }
            "show" => Self::Show,
            "areas" => Self::Areas,
            "reload" => Self::Reload,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command `{other}`, try `help`"),
        };

        Ok(Some(command))
    }

    /// True if the command changes the selection and the map must be rendered again.
    fn changes_view(&self) -> bool {
        matches!(
            self,
            Self::Area(_) | Self::Layers(_) | Self::Cap(_) | Self::Reload
        )
    }
}

fn parse_layers(list: &str) -> anyhow::Result<Vec<LayerArg>> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match name.to_ascii_lowercase().as_str() {
            "points" => Ok(LayerArg::Points),
            "heatmap" => Ok(LayerArg::Heatmap),
            "none" => Ok(LayerArg::None),
            other => Err(anyhow!("unknown layer `{other}`")),
        })
        .collect()
}

/// Renders the initial selection, then applies commands from `input` until it ends or `quit`.
///
/// A bad command is reported and skipped. Load and write failures end the session.
pub fn run_session(
    cache: &DatasetCache,
    options: &ViewOptions,
    args: &SessionArgs,
    input: impl BufRead,
) -> anyhow::Result<()> {
    let mut selection = args.selection.to_selection();
    render(cache, options, &selection, args)?;

    for line in input.lines() {
        let command = match SessionCommand::parse(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                log::error!("{err}");
                continue;
            }
        };

        let changes_view = command.changes_view();
        match command {
            SessionCommand::Area(area) => selection.area = area,
            SessionCommand::Layers(layers) => selection.layers = layer_set(&layers),
            SessionCommand::Cap(cap) => selection.sample_cap = cap,
            SessionCommand::Show => println!(
                "area: {}, points: {}, heatmap: {}, cap: {}",
                selection.area,
                selection.layers.points,
                selection.layers.heatmap,
                selection.sample_cap.get()
            ),
            SessionCommand::Areas => println!("{}", cache.get()?.area_options().join("\n")),
            SessionCommand::Reload => cache.invalidate(),
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => break,
        }

        if changes_view {
            render(cache, options, &selection, args)?;
        }
    }

    Ok(())
}

fn render(
    cache: &DatasetCache,
    options: &ViewOptions,
    selection: &ViewSelection,
    args: &SessionArgs,
) -> anyhow::Result<()> {
    log::debug!("Rendering {selection:?}");
    let dataset = cache.get()?;
    let map = dataset.render(selection, options);
    write_map(&map, args.format, Some(&args.output))
}
