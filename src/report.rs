// src/report.rs

//! Failure reporting to the host automation runtime.
//!
//! The runtime reads workflow commands from stdout; `::error::<message>`
//! marks the step as failed with `message` as its annotation.

use std::io::{self, Write};

/// Escape `message` for use as workflow command data.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// The workflow command line reporting `message` as the failure.
pub fn failure_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Report the run as failed. The caller is responsible for the nonzero
/// process exit.
pub fn set_failed(message: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", failure_command(message))?;
    stdout.flush()
}
