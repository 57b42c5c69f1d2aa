// src/types.rs

use std::fmt;
use std::time::Duration;

/// Environment variables to set on the target application before deploying.
///
/// Keys are unique and keep their first insertion position; inserting an
/// existing key replaces its value in place. Iteration follows insertion
/// order, which is also the order of the `env set` invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraEnv {
    entries: Vec<(String, String)>,
}

impl ExtraEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`; later values win, first positions stay.
    pub fn extend(&mut self, other: ExtraEnv) {
        for (k, v) in other.entries {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ExtraEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = ExtraEnv::new();
        for (k, v) in iter {
            env.insert(k, v);
        }
        env
    }
}

/// Upper bound on how long the deploy invocation is awaited.
///
/// Only positive durations can be represented; the resolver maps anything
/// else to "no timeout".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployTimeout(Duration);

impl DeployTimeout {
    pub fn from_millis(ms: u64) -> Option<Self> {
        if ms == 0 {
            None
        } else {
            Some(Self(Duration::from_millis(ms)))
        }
    }

    pub fn duration(&self) -> Duration {
        self.0
    }
}

impl fmt::Display for DeployTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}

/// How a pipeline run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The deploy invocation exited with code 0.
    Completed,
    /// The timeout fired first; the deploy process was left running.
    TimedOut,
}
