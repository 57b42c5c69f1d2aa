// src/config/model.rs

use std::fmt;
use std::path::PathBuf;

use crate::types::{DeployTimeout, ExtraEnv};

/// Program name used for the wrapped CLI when nothing else is configured.
pub const DEFAULT_CLEVER_CLI: &str = "clever";

/// Fully resolved, validated deployment configuration.
///
/// Built once per run by [`crate::config::resolve`] and consumed by a single
/// [`crate::pipeline::Pipeline`] execution.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    pub token: String,
    pub secret: String,
    pub alias: Option<String>,
    pub app_id: Option<String>,
    pub force: bool,
    pub timeout: Option<DeployTimeout>,
    pub deploy_path: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub quiet: bool,
    pub same_commit_policy: Option<String>,
    pub extra_env: ExtraEnv,
    pub clever_cli: String,
}

impl Configuration {
    /// A configuration with only credentials set and every option at its
    /// default.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
            alias: None,
            app_id: None,
            force: false,
            timeout: None,
            deploy_path: None,
            log_file: None,
            quiet: false,
            same_commit_policy: None,
            extra_env: ExtraEnv::new(),
            clever_cli: DEFAULT_CLEVER_CLI.to_string(),
        }
    }
}

// Credentials must never end up in logs through `{:?}`.
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("token", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("alias", &self.alias)
            .field("app_id", &self.app_id)
            .field("force", &self.force)
            .field("timeout", &self.timeout)
            .field("deploy_path", &self.deploy_path)
            .field("log_file", &self.log_file)
            .field("quiet", &self.quiet)
            .field("same_commit_policy", &self.same_commit_policy)
            .field("extra_env", &self.extra_env.names().collect::<Vec<_>>())
            .field("clever_cli", &self.clever_cli)
            .finish()
    }
}
