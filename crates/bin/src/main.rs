//! fixcov CLI binary.
//!
//! Reads a CSV of observations and prints the rolling EWMA covariance
//! matrices as JSON on stdout. Logs go to stderr.

mod error;
mod input;
mod progress;
mod report;

use clap::{Parser, ValueEnum};
use error::CliError;
use fixcov::covariance::TracingObserver;
use fixcov::{CenteringMode, EwmaWindowConfig, RollingCovariance};
use progress::ProgressObserver;
use report::Report;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fixcov")]
#[command(about = "Fixed-point rolling EWMA covariance", long_about = None)]
#[command(version)]
struct Cli {
    /// CSV file, one row per observation and one column per variable
    input: PathBuf,

    /// JSON file with a rolling window configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Decay factor as a percentage (94 means lambda = 0.94)
    #[arg(long)]
    decay: Option<u32>,

    /// Window width in rows
    #[arg(long)]
    window: Option<usize>,

    /// Centering applied before the second-moment product
    #[arg(long, value_enum)]
    centering: Option<Centering>,

    /// Treat the first CSV row as data rather than column names
    #[arg(long)]
    no_header: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Show a progress bar on stderr
    #[arg(long)]
    progress: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Centering {
    Reference,
    Columnwise,
}

impl From<Centering> for CenteringMode {
    fn from(value: Centering) -> Self {
        match value {
            Centering::Reference => Self::Reference,
            Centering::Columnwise => Self::Columnwise,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = resolve_config(cli)?;
    tracing::debug!(?config, input = %cli.input.display(), "resolved configuration");

    let dataset = input::read_csv(&cli.input, !cli.no_header)?;
    let driver = RollingCovariance::new(config)?;

    let matrices = if cli.progress {
        let mut observer = ProgressObserver::new(driver.window_count(dataset.rows()));
        let matrices = driver.run_with_observer(&dataset.values, &mut observer);
        observer.finish(matrices.is_ok());
        matrices?
    } else {
        driver.run_with_observer(&dataset.values, &mut TracingObserver)?
    };

    let report = Report::new(config, dataset.columns, &matrices);
    let mut stdout = io::stdout().lock();
    if cli.pretty {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
    } else {
        serde_json::to_writer(&mut stdout, &report)?;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Defaults, then the config file, then explicit flags
fn resolve_config(cli: &Cli) -> Result<EwmaWindowConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EwmaWindowConfig::default(),
    };
    if let Some(decay) = cli.decay {
        config.decay_percent = decay;
    }
    if let Some(window) = cli.window {
        config.window = window;
    }
    if let Some(centering) = cli.centering {
        config.centering = centering.into();
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<EwmaWindowConfig, CliError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
