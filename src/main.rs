//! ocserv-log: send a line through the server's logging channels
//!
//! This is the main entry point for the ocserv-log binary. It handles CLI
//! argument parsing, configuration loading and sink selection, then logs one
//! message (or one stdin payload) on the requested channel.
//!
//! # I/O Architecture
//!
//! - **Log lines**: go to syslog, or to stderr with `--stderr` / `sink = "stderr"`
//! - **Diagnostics**: `tracing` output on stderr, silent unless `-v` is given

use anyhow::{Context, Result};
use clap::Parser;
use ocserv_log::{
    cli::Cli,
    cli_handler,
    config::{Config, ConfigLoader},
    telemetry::{self, Sink, SinkMode},
};
use tracing::{debug, warn};

fn main() -> Result<()> {
    // Parse CLI arguments first (before any other initialization)
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    debug!("Parsed CLI arguments: {:?}", cli);

    let config = ConfigLoader::new()
        .load(&cli)
        .context("Failed to load configuration")?;

    debug!("Loaded configuration: {:?}", config);

    // The sink mode is fixed from here on
    telemetry::init_sink(open_sink(&config)?).context("Failed to initialize log sink")?;

    cli_handler::run(&cli, &config, telemetry::sink())
}

/// Open the configured sink, falling back to stderr when syslog is unreachable.
fn open_sink(config: &Config) -> Result<Sink> {
    match config.sink_mode() {
        SinkMode::Stderr => Ok(Sink::stderr()),
        SinkMode::Syslog => {
            let facility = config.facility()?;
            match Sink::syslog(facility, config.ident()) {
                Ok(sink) => Ok(sink),
                Err(e) => {
                    warn!("{}; logging to stderr", e);
                    Ok(Sink::stderr())
                }
            }
        }
    }
}

/// Initialize the tracing subscriber for diagnostics.
///
/// # Verbosity Levels
/// - 0 (default): Only warnings and errors
/// - 1 (-v): Info level
/// - 2 (-vv): Debug level
/// - 3+ (-vvv): Trace level
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
