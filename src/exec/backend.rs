// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The pipeline talks to a `CommandRunner` instead of spawning processes
//! itself, so tests can swap in a scripted fake while production uses
//! [`ProcessRunner`](super::process::ProcessRunner).
//!
//! Launch failures (binary missing, permission denied) come back as
//! `Err(DeployError::Launch)`. A process that ran and exited nonzero comes
//! back as `Ok(code)`; deciding what that means is up to the caller.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::errors::Result;
use crate::output::OutputSink;

/// Exit code of a finished process. Processes killed by a signal report -1.
pub type ExitCode = i32;

/// Boxed, `'static` future returned by runners.
///
/// The future owns everything it needs so the pipeline can detach it (see
/// the deploy timeout).
pub type RunFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

/// One program invocation: program, argument vector, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    pub fn in_dir(mut self, cwd: Option<&Path>) -> Self {
        self.cwd = cwd.map(Path::to_path_buf);
        self
    }

    /// Copy of this invocation with every argument equal to one of
    /// `secrets` replaced by `***`.
    pub fn redacted(&self, secrets: &[&str]) -> Self {
        let args = self
            .args
            .iter()
            .map(|arg| {
                if secrets.contains(&arg.as_str()) {
                    "***".to_string()
                } else {
                    arg.clone()
                }
            })
            .collect();
        Self {
            program: self.program.clone(),
            args,
            cwd: self.cwd.clone(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        if let Some(cwd) = &self.cwd {
            write!(f, " (in {})", cwd.display())?;
        }
        Ok(())
    }
}

/// Exit code and standard output of a captured invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub code: ExitCode,
    pub stdout: String,
}

/// Trait abstracting how external programs are run.
pub trait CommandRunner: Send + Sync {
    /// Run `invocation`, streaming its stdout and stderr into `output`, and
    /// resolve to its exit code.
    fn run(&self, invocation: Invocation, output: OutputSink) -> RunFuture<ExitCode>;

    /// Run `invocation` and capture its stdout instead of streaming it.
    fn capture(&self, invocation: Invocation) -> RunFuture<CapturedOutput>;
}
