// src/exec/git.rs

//! Version-control precondition queries.

use std::path::Path;

use tracing::debug;

use crate::errors::Result;

use super::backend::{CommandRunner, Invocation};

pub const GIT: &str = "git";

/// Ask git whether the working copy at `dir` (or the current directory) is a
/// shallow clone.
///
/// Resolves to `Some(true)` / `Some(false)` when git answers, `None` when it
/// cannot tell (not a repository, unexpected output). Failing to launch git
/// at all is an error.
pub async fn is_shallow_repository(
    runner: &dyn CommandRunner,
    dir: Option<&Path>,
) -> Result<Option<bool>> {
    let invocation = Invocation::new(GIT, ["rev-parse", "--is-shallow-repository"]).in_dir(dir);
    let captured = runner.capture(invocation).await?;

    if captured.code != 0 {
        debug!(exit_code = captured.code, "git rev-parse did not succeed");
        return Ok(None);
    }

    match captured.stdout.trim() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => {
            debug!(output = other, "unexpected git rev-parse output");
            Ok(None)
        }
    }
}
