// src/config/resolve.rs

//! Turn raw inputs into a validated [`Configuration`].

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::extra_env::{collect_prefixed, parse_allow_list, parse_env_block};
use crate::config::model::{Configuration, DEFAULT_CLEVER_CLI};
use crate::errors::{DeployError, Result};
use crate::inputs::InputSource;
use crate::types::{DeployTimeout, ExtraEnv};

pub const TOKEN_ENV: &str = "CLEVER_TOKEN";
pub const SECRET_ENV: &str = "CLEVER_SECRET";

/// Environment prefix for discrete extra-environment entries:
/// `INPUT_SETENV_FOO=bar` sets `FOO=bar`.
pub const EXTRA_ENV_PREFIX: &str = "INPUT_SETENV_";

/// Recognized input names.
pub mod input {
    pub const APP_ID: &str = "appID";
    pub const ALIAS: &str = "alias";
    pub const FORCE: &str = "force";
    pub const TIMEOUT: &str = "timeout";
    pub const DEPLOY_PATH: &str = "deployPath";
    pub const LOG_FILE: &str = "logFile";
    pub const QUIET: &str = "quiet";
    pub const SAME_COMMIT_POLICY: &str = "sameCommitPolicy";
    pub const SET_ENV: &str = "setEnv";
    pub const EXTRA_ENV_SAFELIST: &str = "extraEnvSafelist";
}

/// Resolve a configuration from `source`.
///
/// `clever_cli` overrides the program used for the wrapped CLI.
///
/// Fails on missing credentials and invalid boolean inputs. Unparsable
/// timeouts resolve to "no timeout".
pub fn resolve(source: &dyn InputSource, clever_cli: Option<&str>) -> Result<Configuration> {
    let token = required_env(source, TOKEN_ENV)?;
    let secret = required_env(source, SECRET_ENV)?;

    let force = boolean_input(source, input::FORCE)?;
    let quiet = boolean_input(source, input::QUIET)?;

    let timeout = source
        .input(input::TIMEOUT)
        .and_then(|raw| parse_leading_int(&raw))
        .and_then(|ms| u64::try_from(ms).ok())
        .and_then(DeployTimeout::from_millis);

    let extra_env = resolve_extra_env(source);

    let config = Configuration {
        token,
        secret,
        alias: source.input(input::ALIAS),
        app_id: source.input(input::APP_ID),
        force,
        timeout,
        deploy_path: source.input(input::DEPLOY_PATH).map(PathBuf::from),
        log_file: source.input(input::LOG_FILE).map(PathBuf::from),
        quiet,
        same_commit_policy: source.input(input::SAME_COMMIT_POLICY),
        extra_env,
        clever_cli: clever_cli.unwrap_or(DEFAULT_CLEVER_CLI).to_string(),
    };

    debug!(?config, "resolved configuration");
    Ok(config)
}

fn required_env(source: &dyn InputSource, name: &'static str) -> Result<String> {
    source
        .env_var(name)
        .filter(|v| !v.is_empty())
        .ok_or(DeployError::MissingCredential(name))
}

/// Boolean inputs follow the YAML 1.2 core schema spellings. Absent means
/// `false`; anything unrecognized is an error rather than a silent default.
fn boolean_input(source: &dyn InputSource, name: &str) -> Result<bool> {
    match source.input(name) {
        None => Ok(false),
        Some(value) => match value.as_str() {
            "true" | "True" | "TRUE" => Ok(true),
            "false" | "False" | "FALSE" => Ok(false),
            _ => Err(DeployError::InvalidBoolean {
                input: name.to_string(),
                value,
            }),
        },
    }
}

/// Parse the integer at the start of `raw` (after optional whitespace and
/// sign), ignoring anything that follows it: `"1800ms"` is `1800`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn resolve_extra_env(source: &dyn InputSource) -> ExtraEnv {
    let block = source.multiline_input(input::SET_ENV);
    let mut env = parse_env_block(block.iter().map(String::as_str));

    let allow_list = source
        .input(input::EXTRA_ENV_SAFELIST)
        .map(|raw| parse_allow_list(&raw))
        .unwrap_or_default();
    env.extend(collect_prefixed(
        source.env_vars_with_prefix(EXTRA_ENV_PREFIX),
        EXTRA_ENV_PREFIX,
        &allow_list,
    ));

    if !env.is_empty() {
        info!("Setting extra environment variables:");
        for name in env.names() {
            info!("  {name}");
        }
    }
    env
}
