mod config;
mod error;
mod join;
mod records;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;

use config::{Args, RunConfig};
use error::PrepError;
use join::JoinSummary;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = RunConfig::resolve(&args).context("Could not resolve the run configuration")?;

    let summary = run(&config)?;
    println!("{summary}");
    println!("Done! {} has been written.", config.output.display());
    Ok(())
}

/// Load, join, write. Any failure aborts before the output is replaced.
fn run(config: &RunConfig) -> Result<JoinSummary, PrepError> {
    let inputs = records::load(&config.stations, &config.pairs, &config.cities)?;

    let progress = if config.show_progress {
        utils::progress_bar_for_count(inputs.stations.len())
    } else {
        ProgressBar::hidden()
    };
    let (updated_stations, summary) = join::join(&inputs, progress)?;

    utils::write_json_file(&config.output, &updated_stations)?;
    Ok(summary)
}
