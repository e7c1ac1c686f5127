//! Command line front end of the crime incident map.
//!
//! ```sh
//! crimemap --incidents df_streamlit.csv --boundaries alcaldias.json areas
//! crimemap render --area IZTAPALAPA --layers points,heatmap --format html -o map.html
//! crimemap session -o map.html < commands.txt
//! ```

use anyhow::Context;
use clap::Parser;
use crimemap::DatasetCache;

mod args;
mod output;
mod session;

use args::{Cli, Command};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.dashboard_config()?;
    let cache = DatasetCache::new(config.data);

    match &cli.command {
        Command::Areas => {
            let dataset = cache.get().context("Failed to load the dataset")?;
            for option in dataset.area_options() {
                println!("{option}");
            }
        }
        Command::Render(args) => {
            let dataset = cache.get().context("Failed to load the dataset")?;
            let map = dataset.render(&args.selection.to_selection(), &config.view);
            output::write_map(&map, args.format, args.output.as_deref())?;
        }
        Command::Session(args) => {
            let stdin = std::io::stdin().lock();
            session::run_session(&cache, &config.view, args, stdin)?;
        }
    }

    Ok(())
}
