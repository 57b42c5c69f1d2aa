use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clever_deploy::errors::DeployError;
use clever_deploy::exec::{CapturedOutput, CommandRunner, ExitCode, Invocation, RunFuture};
use clever_deploy::output::OutputSink;

/// How the fake answers `git rev-parse --is-shallow-repository`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitAnswer {
    Shallow,
    Full,
    NotARepository,
    Missing,
}

#[derive(Default)]
struct State {
    calls: Vec<Invocation>,
    captures: Vec<Invocation>,
    finished: Vec<String>,
    exit_codes: HashMap<String, ExitCode>,
    delays: HashMap<String, Duration>,
    output: HashMap<String, Vec<u8>>,
    unlaunchable: bool,
    git: Option<GitAnswer>,
}

/// A fake command runner that:
/// - records every invocation, in order
/// - answers with scripted exit codes (default 0), keyed by subcommand
///   (`login`, `link`, `env`, `deploy`)
/// - can delay a subcommand, write scripted output, or fail to launch.
///
/// Clones share state, so keep one to inspect after handing another to the
/// pipeline.
#[derive(Clone, Default)]
pub struct FakeRunner {
    state: Arc<Mutex<State>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_code(self, subcommand: &str, code: ExitCode) -> Self {
        self.lock().exit_codes.insert(subcommand.to_string(), code);
        self
    }

    pub fn with_delay(self, subcommand: &str, delay: Duration) -> Self {
        self.lock().delays.insert(subcommand.to_string(), delay);
        self
    }

    pub fn with_output(self, subcommand: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.lock()
            .output
            .insert(subcommand.to_string(), bytes.into());
        self
    }

    /// Every `run` fails as if the program did not exist.
    pub fn unlaunchable(self) -> Self {
        self.lock().unlaunchable = true;
        self
    }

    pub fn with_git(self, answer: GitAnswer) -> Self {
        self.lock().git = Some(answer);
        self
    }

    /// Invocations passed to `run`, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.lock().calls.clone()
    }

    /// Argument vectors passed to `run`, in order.
    pub fn args(&self) -> Vec<Vec<String>> {
        self.lock().calls.iter().map(|c| c.args.clone()).collect()
    }

    /// Invocations passed to `capture`, in order.
    pub fn captures(&self) -> Vec<Invocation> {
        self.lock().captures.clone()
    }

    /// Subcommands whose `run` future ran to completion.
    pub fn finished(&self) -> Vec<String> {
        self.lock().finished.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

/// The launch error a missing program produces.
fn not_found(invocation: &Invocation) -> DeployError {
    DeployError::Launch {
        program: invocation.program.clone(),
        source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
    }
}

fn subcommand(invocation: &Invocation) -> String {
    invocation.args.first().cloned().unwrap_or_default()
}

impl CommandRunner for FakeRunner {
    fn run(&self, invocation: Invocation, output: OutputSink) -> RunFuture<ExitCode> {
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            let sub = subcommand(&invocation);
            let (delay, code, bytes, unlaunchable) = {
                let mut guard = state.lock().unwrap();
                guard.calls.push(invocation.clone());
                (
                    guard.delays.get(&sub).copied(),
                    guard.exit_codes.get(&sub).copied().unwrap_or(0),
                    guard.output.get(&sub).cloned(),
                    guard.unlaunchable,
                )
            };

            if unlaunchable {
                return Err(not_found(&invocation));
            }

            if let Some(bytes) = bytes {
                output.write(&bytes);
            }
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            state.lock().unwrap().finished.push(sub);
            Ok(code)
        })
    }

    fn capture(&self, invocation: Invocation) -> RunFuture<CapturedOutput> {
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            let answer = {
                let mut guard = state.lock().unwrap();
                guard.captures.push(invocation.clone());
                guard.git.unwrap_or(GitAnswer::Full)
            };

            let (code, stdout) = match answer {
                GitAnswer::Shallow => (0, "true\n"),
                GitAnswer::Full => (0, "false\n"),
                GitAnswer::NotARepository => (128, ""),
                GitAnswer::Missing => {
                    return Err(not_found(&invocation));
                }
            };

            Ok(CapturedOutput {
                code,
                stdout: stdout.to_string(),
            })
        })
    }
}
