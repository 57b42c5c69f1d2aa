// src/inputs/mod.rs

//! Raw input sources.
//!
//! The host automation runtime hands inputs to actions as environment
//! variables named `INPUT_<NAME>`, next to ordinary environment variables
//! such as the credentials. [`InputSource`] exposes both views:
//!
//! - [`ProcessEnv`] reads the real process environment.
//! - [`FileInputs`] layers a TOML file of input values under another source,
//!   for running a deployment outside the runtime.
//! - [`mock::MockInputs`] is an in-memory source for tests.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{DeployError, Result};
use crate::fs::FileSystem;

pub mod mock;

/// Name of the environment variable carrying input `name`.
///
/// Mirrors the runtime's convention: spaces become `_`, then upper-case.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

pub trait InputSource: Send + Sync + Debug {
    /// A raw process environment variable.
    fn env_var(&self, name: &str) -> Option<String>;

    /// All environment variables whose name starts with `prefix`, sorted by
    /// name.
    fn env_vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)>;

    /// An action input, trimmed. Empty values count as absent.
    fn input(&self, name: &str) -> Option<String> {
        self.env_var(&input_env_name(name))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// A multi-line action input, one entry per non-empty line.
    fn multiline_input(&self, name: &str) -> Vec<String> {
        self.input(name)
            .map(|v| {
                v.lines()
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The real process environment.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnv;

impl InputSource for ProcessEnv {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    /// Variables whose name or value is not valid unicode are skipped.
    fn env_vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        let mut vars: Vec<(String, String)> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        vars.sort();
        vars
    }
}

/// Input values loaded from a TOML file, used when the environment does not
/// provide them.
///
/// ```toml
/// appID = "app_facade42-cafe-babe-cafe-deadf00dbaad"
/// force = true
/// timeout = 1800000
/// setEnv = """
/// FOO=foo
/// """
/// ```
///
/// Credentials are never read from the file.
#[derive(Debug)]
pub struct FileInputs<S: InputSource> {
    inner: S,
    values: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl FileValue {
    fn into_string(self) -> String {
        match self {
            FileValue::Str(s) => s,
            FileValue::Int(i) => i.to_string(),
            FileValue::Bool(b) => b.to_string(),
        }
    }
}

impl<S: InputSource> FileInputs<S> {
    pub fn load(fs: &dyn FileSystem, path: impl AsRef<Path>, inner: S) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs.read_to_string(path)?;
        let raw: BTreeMap<String, FileValue> =
            toml::from_str(&contents).map_err(|e| DeployError::InputsFile {
                path: PathBuf::from(path),
                message: e.to_string(),
            })?;

        // Keys are matched the way the runtime matches input names.
        let values = raw
            .into_iter()
            .map(|(k, v)| (input_env_name(&k), v.into_string()))
            .collect();

        Ok(Self { inner, values })
    }
}

impl<S: InputSource> InputSource for FileInputs<S> {
    fn env_var(&self, name: &str) -> Option<String> {
        self.inner
            .env_var(name)
            .or_else(|| self.values.get(name).cloned())
    }

    fn env_vars_with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        let mut merged: BTreeMap<String, String> = self
            .values
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        merged.extend(self.inner.env_vars_with_prefix(prefix));
        merged.into_iter().collect()
    }
}
