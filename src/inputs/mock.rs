// src/inputs/mock.rs

use std::collections::BTreeMap;

use super::{input_env_name, InputSource};

/// In-memory environment for tests.
#[derive(Debug, Clone, Default)]
pub struct MockInputs {
    vars: BTreeMap<String, String>,
}

impl MockInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw environment variable.
    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    /// Set an action input (stored as `INPUT_<NAME>`).
    pub fn with_input(self, name: &str, value: &str) -> Self {
        let key = input_env_name(name);
        self.with_env(&key, value)
    }

    /// Both credentials set to `token` / `secret`.
    pub fn with_credentials(self) -> Self {
        self.with_env("CLEVER_TOKEN", "token")
            .with_env("CLEVER_SECRET", "secret")
    }
}

impl InputSource for MockInputs {
    fn env_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn env_vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        self.vars
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
