// LogTally - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (logtally.toml)
// 3. Logging initialisation (debug mode support)
// 4. Pipeline execution and process exit code

use clap::Parser;
use logtally::app;
use logtally::util;
use logtally::util::constants;
use std::path::PathBuf;

/// LogTally - Apache access log statistics and flat-file export.
///
/// Parses an access log into structured records, prints summary tables
/// (status codes, top pages, methods, top clients, daily volume), and
/// exports the dataset and the status aggregate as CSV for relational
/// loading.
#[derive(Parser, Debug)]
#[command(name = "LogTally", version, about)]
struct Cli {
    /// Access log file to analyse (defaults to data/web_logs.txt).
    input: Option<PathBuf>,

    /// Directory for export artifacts (defaults to outputs/).
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Rows shown in the top-pages and top-clients tables.
    #[arg(short = 'n', long = "top")]
    top: Option<usize>,

    /// Configuration file (defaults to ./logtally.toml when present).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Also write the run summary as JSON to this path.
    #[arg(long = "summary-json")]
    summary_json: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is loaded before logging so [logging] level can take effect;
    // an unusable explicit --config path is fatal before any output.
    let (mut config, warnings) = match app::config::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    util::logging::init(cli.debug, config.log_level.as_deref());

    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LogTally starting"
    );

    // CLI overrides take priority over config values.
    if let Some(path) = cli.input {
        config.input_path = path;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(rows) = cli.top {
        if (constants::MIN_PREVIEW_ROWS..=constants::MAX_PREVIEW_ROWS).contains(&rows) {
            config.preview_rows = rows;
        } else {
            tracing::warn!(
                rows,
                min = constants::MIN_PREVIEW_ROWS,
                max = constants::MAX_PREVIEW_ROWS,
                "--top out of range; keeping {}",
                config.preview_rows
            );
        }
    }

    if let Err(e) = app::pipeline::run(&config, cli.summary_json.as_deref()) {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
