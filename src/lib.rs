// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod inputs;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod types;

use std::io::Write;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::Configuration;
use crate::errors::Result;
use crate::exec::ProcessRunner;
use crate::fs::RealFileSystem;
use crate::inputs::{FileInputs, ProcessEnv};
use crate::pipeline::{plan, Pipeline};
use crate::types::DeployOutcome;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - input sources (environment, optional inputs file)
/// - argument resolution
/// - the deployment pipeline with the real process runner
///
/// With `--dry-run` the planned calls are printed instead and the outcome is
/// reported as completed.
pub async fn run(args: CliArgs) -> Result<DeployOutcome> {
    let config = match &args.inputs {
        Some(path) => {
            let source = FileInputs::load(&RealFileSystem, path, ProcessEnv)?;
            config::resolve(&source, Some(&args.clever_cli))?
        }
        None => config::resolve(&ProcessEnv, Some(&args.clever_cli))?,
    };

    if args.dry_run {
        print_dry_run(&config, &mut std::io::stdout().lock())?;
        return Ok(DeployOutcome::Completed);
    }

    let outcome = Pipeline::new(config, ProcessRunner::new()).run().await?;
    info!(?outcome, "deployment finished");
    Ok(outcome)
}

/// Dry-run output: resolved options and the CLI calls a successful run makes.
pub fn print_dry_run(config: &Configuration, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "clever-deploy dry-run")?;
    writeln!(out, "  cli = {}", config.clever_cli)?;
    if let Some(timeout) = config.timeout {
        writeln!(out, "  timeout = {timeout}")?;
    }
    if let Some(path) = &config.log_file {
        writeln!(out, "  log_file = {}", path.display())?;
    }
    writeln!(out, "  quiet = {}", config.quiet)?;
    writeln!(out)?;

    let steps = plan(config);
    writeln!(out, "invocations ({}):", steps.len())?;
    for planned in steps {
        writeln!(out, "  - {}", planned.invocation)?;
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
