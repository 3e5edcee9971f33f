// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `filemirror`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "filemirror",
    version,
    about = "Mirror filtered source trees into destination trees by polling.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (JSON, or TOML with a `.toml` extension).
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: String,

    /// Run a single cycle and exit.
    #[arg(short = 'o', long)]
    pub once: bool,

    /// Log every copy, delete and cleanup (same as `--log-level debug`).
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Skip the cleanup sweep of destination trees on startup.
    #[arg(long)]
    pub no_clean: bool,

    /// Interval in milliseconds between scans.
    #[arg(long, value_name = "MS", default_value_t = 3000)]
    pub tick: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Takes precedence over `--verbose` and `FILEMIRROR_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load and validate the config, print the resolved mappings, and exit.
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
