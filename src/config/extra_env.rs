// src/config/extra_env.rs

//! Extraction of the extra environment variables to set on the application.
//!
//! Two population schemes are supported:
//!
//! - a multi-line block of `NAME=value` declarations ([`parse_env_block`]);
//! - discrete, name-prefixed entries, optionally filtered by an allow-list
//!   ([`collect_prefixed`]).

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::types::ExtraEnv;

/// One declaration per line: an ASCII word, `=`, then anything (including
/// further `=` characters).
static ENV_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+)=(.*)$").expect("ENV_LINE_REGEX is a valid pattern")
});

/// Parse `NAME=value` lines.
///
/// Lines are trimmed first. Blank lines, comments and anything else that is
/// not a declaration are ignored. Only the first `=` separates the name from
/// the value.
pub fn parse_env_block<'a>(lines: impl IntoIterator<Item = &'a str>) -> ExtraEnv {
    let mut env = ExtraEnv::new();
    for line in lines {
        let line = line.trim();
        if let Some(caps) = ENV_LINE_REGEX.captures(line) {
            env.insert(&caps[1], &caps[2]);
        }
    }
    env
}

/// Parse a comma-separated allow-list. Whitespace around names is ignored,
/// empty names are dropped.
pub fn parse_allow_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect `(variable, value)` pairs whose variable starts with `prefix`
/// into entries named after the remainder of the variable name.
///
/// With a non-empty `allow_list`, names not on it are dropped with a
/// warning. An empty allow-list lets everything through.
pub fn collect_prefixed(
    vars: impl IntoIterator<Item = (String, String)>,
    prefix: &str,
    allow_list: &[String],
) -> ExtraEnv {
    let mut env = ExtraEnv::new();
    for (var, value) in vars {
        let Some(name) = var.strip_prefix(prefix) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if !allow_list.is_empty() && !allow_list.iter().any(|allowed| allowed == name) {
            warn!(
                name,
                "extra environment variable is not in the allow-list; skipping"
            );
            continue;
        }
        env.insert(name, value);
    }
    env
}
