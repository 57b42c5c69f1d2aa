// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `CommandRunner` trait the pipeline talks to,
//!   and the `Invocation` it is given.
//! - [`process`] contains `ProcessRunner`, the production implementation on
//!   top of `tokio::process::Command`. Tests replace it with a fake.
//! - [`git`] holds the shallow-clone query used as a pipeline precondition.

pub mod backend;
pub mod git;
pub mod process;

pub use backend::{CapturedOutput, CommandRunner, ExitCode, Invocation, RunFuture};
pub use process::ProcessRunner;
