#![allow(dead_code)]

use std::path::PathBuf;

use clever_deploy::config::Configuration;
use clever_deploy::types::{DeployTimeout, ExtraEnv};

/// Builder for `Configuration` to simplify test setup.
///
/// Starts from credentials `token` / `secret`, the `clever` program and
/// every option at its default.
pub struct ConfigBuilder {
    config: Configuration,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Configuration::new("token", "secret"),
        }
    }

    pub fn app_id(mut self, app_id: &str) -> Self {
        self.config.app_id = Some(app_id.to_string());
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.config.alias = Some(alias.to_string());
        self
    }

    pub fn force(mut self, val: bool) -> Self {
        self.config.force = val;
        self
    }

    pub fn quiet(mut self, val: bool) -> Self {
        self.config.quiet = val;
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout = DeployTimeout::from_millis(ms);
        self
    }

    pub fn deploy_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.deploy_path = Some(path.into());
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    pub fn same_commit_policy(mut self, policy: &str) -> Self {
        self.config.same_commit_policy = Some(policy.to_string());
        self
    }

    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.config.extra_env.insert(name, value);
        self
    }

    pub fn extra_env(mut self, env: ExtraEnv) -> Self {
        self.config.extra_env = env;
        self
    }

    pub fn clever_cli(mut self, program: &str) -> Self {
        self.config.clever_cli = program.to_string();
        self
    }

    pub fn build(self) -> Configuration {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
