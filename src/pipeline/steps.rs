// src/pipeline/steps.rs

//! Argument vectors for each wrapped CLI call.
//!
//! Argument order is part of the contract with the CLI and must not change.

use std::fmt;

/// A step of the deployment that invokes the wrapped CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Login,
    Link,
    SetEnv,
    Deploy,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Login => "Authentication",
            Step::Link => "Linking application",
            Step::SetEnv => "Setting environment variable",
            Step::Deploy => "Deployment",
        };
        f.write_str(s)
    }
}

pub fn login_args(token: &str, secret: &str) -> Vec<String> {
    vec![
        "login".into(),
        "--token".into(),
        token.into(),
        "--secret".into(),
        secret.into(),
    ]
}

/// Link the application and register `app_id` as its alias, so every later
/// call can target it with `--alias <app_id>`.
pub fn link_args(app_id: &str) -> Vec<String> {
    vec!["link".into(), app_id.into(), "--alias".into(), app_id.into()]
}

pub fn env_set_args(alias: Option<&str>, name: &str, value: &str) -> Vec<String> {
    let mut args: Vec<String> = vec!["env".into(), "set".into()];
    if let Some(alias) = alias {
        args.extend(["--alias".into(), alias.into()]);
    }
    args.extend([name.into(), value.into()]);
    args
}

pub fn deploy_args(
    alias: Option<&str>,
    force: bool,
    same_commit_policy: Option<&str>,
) -> Vec<String> {
    let mut args: Vec<String> = vec!["deploy".into()];
    if let Some(alias) = alias {
        args.extend(["--alias".into(), alias.into()]);
    }
    if force {
        args.push("--force".into());
    }
    if let Some(policy) = same_commit_policy {
        args.extend(["--same-commit-policy".into(), policy.into()]);
    }
    args
}
