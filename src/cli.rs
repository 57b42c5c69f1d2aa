// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Deployment options themselves are not flags: they come from the action
//! inputs (`INPUT_*` environment variables) and, optionally, an inputs file.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CLEVER_CLI;

/// Command-line arguments for `clever-deploy`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "clever-deploy",
    version,
    about = "Deploy an application to Clever Cloud by driving the clever CLI.",
    long_about = None
)]
pub struct CliArgs {
    /// Program (name or path) used to run the clever CLI.
    #[arg(long, env = "CLEVER_CLI", value_name = "PATH", default_value = DEFAULT_CLEVER_CLI)]
    pub clever_cli: String,

    /// TOML file of input values, for running outside a workflow.
    ///
    /// `INPUT_*` environment variables take precedence over the file.
    /// Credentials are always read from the environment.
    #[arg(long, value_name = "FILE")]
    pub inputs: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CLEVER_DEPLOY_LOG`, then `RUNNER_DEBUG`, then a default
    /// level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve the configuration and print the planned CLI calls without
    /// running any of them.
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
