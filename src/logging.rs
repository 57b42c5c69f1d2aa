// src/logging.rs

//! Logging setup for `clever-deploy` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `CLEVER_DEPLOY_LOG` environment variable (e.g. "info", "debug")
//! 3. `debug` when the runtime has step debugging on (`RUNNER_DEBUG=1`)
//! 4. default to `info`
//!
//! Logs are sent to STDERR so that stdout carries the CLI output and the
//! workflow commands.

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "CLEVER_DEPLOY_LOG";
pub const RUNNER_DEBUG_ENV: &str = "RUNNER_DEBUG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(
        cli_level,
        std::env::var(LOG_ENV).ok().as_deref(),
        std::env::var(RUNNER_DEBUG_ENV).ok().as_deref(),
    );

    fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;

    Ok(())
}

/// Pick the effective level from the flag, `CLEVER_DEPLOY_LOG` and
/// `RUNNER_DEBUG` values.
pub fn resolve_level(
    cli_level: Option<LogLevel>,
    log_env: Option<&str>,
    runner_debug: Option<&str>,
) -> tracing::Level {
    if let Some(lvl) = cli_level {
        return level_from_log_level(lvl);
    }
    if let Some(level) = log_env.and_then(parse_level_str) {
        return level;
    }
    if runner_debug.map(str::trim) == Some("1") {
        return tracing::Level::DEBUG;
    }
    tracing::Level::INFO
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
