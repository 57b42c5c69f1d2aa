// src/exec/process.rs

//! Real process runner on top of `tokio::process`.

use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::DeployError;
use crate::output::OutputSink;

use super::backend::{CapturedOutput, CommandRunner, ExitCode, Invocation, RunFuture};

/// Runs invocations as OS processes.
///
/// Children are not killed when their future is dropped: a deploy that
/// outlives its timeout keeps running on its own.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

fn command_for(invocation: &Invocation) -> Command {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    if let Some(cwd) = &invocation.cwd {
        cmd.current_dir(cwd);
    }
    cmd.stdin(Stdio::null()).kill_on_drop(false);
    cmd
}

fn launch_error(invocation: &Invocation, source: std::io::Error) -> DeployError {
    DeployError::Launch {
        program: invocation.program.clone(),
        source,
    }
}

/// Forward `reader` to `sink` one line at a time, so lines from stdout and
/// stderr never interleave mid-line. A last line without `\n` is still sent
/// as a whole line.
async fn pump<R: AsyncBufRead + Unpin>(mut reader: R, sink: OutputSink, stream: &'static str) {
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) if line.ends_with(b"\n") => sink.write(&line),
            Ok(_) => sink.write_line_end(&line),
            Err(err) => {
                warn!(stream, error = %err, "failed reading process output");
                break;
            }
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: Invocation, output: OutputSink) -> RunFuture<ExitCode> {
        Box::pin(async move {
            let mut cmd = command_for(&invocation);
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

            debug!(program = %invocation.program, cwd = ?invocation.cwd, "spawning process");
            let mut child = cmd
                .spawn()
                .map_err(|source| launch_error(&invocation, source))?;

            let stdout = child.stdout.take().map(|out| {
                tokio::spawn(pump(BufReader::new(out), output.clone(), "stdout"))
            });
            let stderr = child.stderr.take().map(|err| {
                tokio::spawn(pump(BufReader::new(err), output.clone(), "stderr"))
            });
            drop(output);

            let status = child
                .wait()
                .await
                .with_context(|| format!("waiting for process '{}'", invocation.program))?;

            // Let the readers hit EOF so no trailing output is lost.
            for handle in [stdout, stderr].into_iter().flatten() {
                if let Err(err) = handle.await {
                    debug!(error = %err, "output reader task ended abnormally");
                }
            }

            let code = status.code().unwrap_or(-1);
            debug!(program = %invocation.program, exit_code = code, "process exited");
            Ok(code)
        })
    }

    fn capture(&self, invocation: Invocation) -> RunFuture<CapturedOutput> {
        Box::pin(async move {
            let out = command_for(&invocation)
                .stderr(Stdio::null())
                .output()
                .await
                .map_err(|source| launch_error(&invocation, source))?;

            Ok(CapturedOutput {
                code: out.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            })
        })
    }
}
