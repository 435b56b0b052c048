// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `dagfolio`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagfolio",
    version,
    about = "Render a resume as an Airflow-style DAG page.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the portfolio data file (TOML, or JSON by extension).
    #[arg(long, value_name = "PATH", default_value = "portfolio.toml")]
    pub data: String,

    /// Where to write the rendered HTML page.
    #[arg(long, value_name = "PATH", default_value = "dist/index.html")]
    pub out: String,

    /// Play the execution animation before rendering, so the page shows
    /// final task statuses.
    #[arg(long)]
    pub simulate: bool,

    /// Seed for the simulated task durations and failures.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Keep the positions from the data file instead of running auto layout.
    #[arg(long)]
    pub keep_positions: bool,

    /// Directory holding the best-effort state snapshot.
    ///
    /// When set, the canvas state is saved there after rendering.
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<String>,

    /// Restore statuses, positions and viewport from the snapshot before
    /// rendering (requires `--snapshot-dir`).
    #[arg(long, requires = "snapshot_dir")]
    pub restore: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGFOLIO_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print levels and execution order, write nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
