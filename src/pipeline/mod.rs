// src/pipeline/mod.rs

//! Deployment pipeline.
//!
//! A run goes through these states, each one a precondition for the next:
//!
//! 1. the working copy must not be a shallow clone;
//! 2. the deploy path, if any, must be an existing directory;
//! 3. `login` with the credentials;
//! 4. `link` when an application id is configured, which fixes the effective
//!    alias to that id for every later call;
//! 5. one `env set` per extra environment variable, in order;
//! 6. `deploy`, optionally raced against a timeout.
//!
//! Any failure short-circuits the remaining steps. Nothing is retried or
//! rolled back.
//!
//! When the timeout wins the race the run is a success: the deploy process
//! is detached and left running, never killed, since the push it performs
//! may legitimately outlive the workflow's patience.

pub mod plan;
pub mod steps;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::errors::{DeployError, Result};
use crate::exec::{git, CommandRunner, ExitCode, Invocation};
use crate::fs::{FileSystem, RealFileSystem};
use crate::output::{Multiplexer, OutputSink};
use crate::types::{DeployOutcome, DeployTimeout};

pub use plan::{plan, PlannedStep};
pub use steps::Step;

/// How long closing the output waits for destinations still fed by a
/// detached deploy process.
pub const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// One deployment run. Consumed by [`Pipeline::run`].
pub struct Pipeline<R: CommandRunner> {
    config: Configuration,
    runner: R,
    fs: Arc<dyn FileSystem>,
    console: Box<dyn Write + Send>,
}

impl<R: CommandRunner> Pipeline<R> {
    /// A pipeline using the real filesystem and stdout as the console.
    pub fn new(config: Configuration, runner: R) -> Self {
        Self {
            config,
            runner,
            fs: Arc::new(RealFileSystem),
            console: Box::new(std::io::stdout()),
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_console(mut self, console: Box<dyn Write + Send>) -> Self {
        self.console = console;
        self
    }

    pub async fn run(self) -> Result<DeployOutcome> {
        let Pipeline {
            config,
            runner,
            fs,
            console,
        } = self;

        debug!(cli = %config.clever_cli, "Clever CLI path");

        ensure_full_clone(&runner).await?;
        let cwd = resolve_working_dir(&config, fs.as_ref())?;

        let output = Multiplexer::for_config(&config, fs.as_ref(), console)?;
        let run = Run {
            config: &config,
            runner: &runner,
            cwd: cwd.as_deref(),
            sink: output.sink(),
        };
        let result = run.execute().await;
        drop(run);

        output.close(OUTPUT_DRAIN_GRACE).await;
        result
    }
}

async fn ensure_full_clone(runner: &dyn CommandRunner) -> Result<()> {
    match git::is_shallow_repository(runner, None).await {
        Ok(Some(true)) => Err(DeployError::ShallowClone),
        Ok(Some(false)) => Ok(()),
        Ok(None) => {
            warn!("could not determine whether the repository is a shallow clone; continuing");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "could not run git to check for a shallow clone; continuing");
            Ok(())
        }
    }
}

fn resolve_working_dir(config: &Configuration, fs: &dyn FileSystem) -> Result<Option<PathBuf>> {
    match &config.deploy_path {
        None => Ok(None),
        Some(path) if fs.is_dir(path) => {
            debug!(path = %path.display(), "deploying from directory");
            Ok(Some(path.clone()))
        }
        Some(path) => Err(DeployError::DeployPathNotFound(path.clone())),
    }
}

/// Pipeline-local state shared by the invoking steps.
struct Run<'a, R: CommandRunner> {
    config: &'a Configuration,
    runner: &'a R,
    cwd: Option<&'a Path>,
    sink: OutputSink,
}

impl<R: CommandRunner> Run<'_, R> {
    async fn execute(&self) -> Result<DeployOutcome> {
        self.login().await?;
        let alias = self.link().await?;
        self.set_extra_env(alias).await?;
        self.deploy(alias).await
    }

    fn invocation(&self, args: Vec<String>) -> Invocation {
        Invocation::new(self.config.clever_cli.as_str(), args).in_dir(self.cwd)
    }

    /// Run `invocation`, then close its last output line so the next
    /// invocation's output starts on a fresh one.
    async fn run_to_end(&self, invocation: Invocation) -> Result<ExitCode> {
        let result = self.runner.run(invocation, self.sink.clone()).await;
        self.sink.end_line();
        result
    }

    async fn invoke(&self, step: Step, invocation: Invocation) -> Result<()> {
        let code = self.run_to_end(invocation).await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step, code });
        }
        Ok(())
    }

    /// Only stores the credentials where the CLI expects them; no
    /// working directory needed.
    async fn login(&self) -> Result<()> {
        let args = steps::login_args(&self.config.token, &self.config.secret);
        let invocation = Invocation::new(self.config.clever_cli.as_str(), args);
        self.invoke(Step::Login, invocation).await
    }

    /// Link the configured application id, if any, and return the alias every
    /// following step targets.
    ///
    /// A linked id always wins over a configured alias: with an existing
    /// `.clever.json`, `deploy` needs an alias to pick the linked app.
    async fn link(&self) -> Result<Option<&str>> {
        match self.config.app_id.as_deref() {
            Some(app_id) => {
                debug!(app_id, "Linking application");
                self.invoke(Step::Link, self.invocation(steps::link_args(app_id)))
                    .await?;
                Ok(Some(app_id))
            }
            None => Ok(self.config.alias.as_deref()),
        }
    }

    async fn set_extra_env(&self, alias: Option<&str>) -> Result<()> {
        for (name, value) in self.config.extra_env.iter() {
            debug!(name, "setting environment variable");
            let args = steps::env_set_args(alias, name, value);
            self.invoke(Step::SetEnv, self.invocation(args)).await?;
        }
        Ok(())
    }

    async fn deploy(&self, alias: Option<&str>) -> Result<DeployOutcome> {
        let args = steps::deploy_args(
            alias,
            self.config.force,
            self.config.same_commit_policy.as_deref(),
        );
        let invocation = self.invocation(args);

        let code = match self.config.timeout {
            None => self.run_to_end(invocation).await?,
            Some(timeout) => match self.deploy_with_timeout(invocation, timeout).await? {
                Some(code) => code,
                None => return Ok(DeployOutcome::TimedOut),
            },
        };

        info!(code, "deploy exited");
        if code != 0 {
            return Err(DeployError::StepFailed {
                step: Step::Deploy,
                code,
            });
        }
        Ok(DeployOutcome::Completed)
    }

    /// Race the deploy process against `timeout`. `None` means the timer won
    /// and the process was left running.
    async fn deploy_with_timeout(
        &self,
        invocation: Invocation,
        timeout: DeployTimeout,
    ) -> Result<Option<ExitCode>> {
        let sink = self.sink.clone();
        let running = self.runner.run(invocation, sink.clone());
        let mut deploy = tokio::spawn(async move {
            let result = running.await;
            sink.end_line();
            result
        });

        tokio::select! {
            biased;

            joined = &mut deploy => {
                let code = joined.map_err(anyhow::Error::from)??;
                Ok(Some(code))
            }
            _ = tokio::time::sleep(timeout.duration()) => {
                info!(%timeout, "Deployment timed out, moving on with workflow run");
                // Dropping the handle detaches the task; the process is not
                // killed.
                drop(deploy);
                Ok(None)
            }
        }
    }
}
