//! Derive Prometheus metrics from a benchmark result dump.
//!
//! Runs a single collection pass over the dump and writes the derived
//! observations to stdout in Prometheus text exposition format. Logs go
//! to stderr, filtered by `RUST_LOG`.

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use gleaner::{
    config::{Config, DEFAULT_METRIC_NAME},
    derive::Deriver,
    sink::ObservationSet,
    source::FileSource,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to load gleaner config: {0}")]
    Config(#[from] gleaner::config::Error),
    #[error("no input dump: pass --input or a config file that sets one")]
    NoInput,
}

#[derive(Parser, Debug)]
#[command(version, about = "Derive Prometheus metrics from benchmark result dumps")]
struct Opts {
    /// Path to a YAML config file
    #[arg(long)]
    config_path: Option<PathBuf>,
    /// Benchmark result dump, JSON or YAML by extension; overrides the
    /// config file
    #[arg(long)]
    input: Option<PathBuf>,
    /// Exported metric family name; overrides the config file
    #[arg(long)]
    metric_name: Option<String>,
}

fn inner_main(opts: Opts) -> Result<(), Error> {
    let config = match &opts.config_path {
        Some(path) => Some(Config::from_path(path)?),
        None => None,
    };

    let input = opts
        .input
        .or_else(|| config.as_ref().map(|config| config.input.clone()))
        .ok_or(Error::NoInput)?;
    let metric_name = opts
        .metric_name
        .or(config.map(|config| config.metric_name))
        .unwrap_or_else(|| DEFAULT_METRIC_NAME.to_string());

    let source = FileSource::new(input);
    let mut deriver = Deriver::new(ObservationSet::new());
    let summary = deriver.pass(&source);
    info!(
        observations = summary.observations,
        skipped_items = summary.skipped_items,
        skipped_keys = summary.skipped_keys,
        source_failed = summary.source_failed,
        "collection pass complete"
    );

    let mut stdout = io::stdout().lock();
    stdout.write_all(deriver.sink().render(&metric_name).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opts = Opts::parse();
    match inner_main(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
