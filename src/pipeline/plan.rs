// src/pipeline/plan.rs

//! Static view of the invocations a configuration leads to, used by
//! `--dry-run`.

use crate::config::Configuration;
use crate::exec::Invocation;

use super::steps::{deploy_args, env_set_args, link_args, login_args, Step};

const REDACTED: &str = "***";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: Step,
    pub invocation: Invocation,
}

/// The wrapped CLI calls a successful run of `config` makes, in order.
///
/// Credentials and extra environment values are replaced by `***`; only
/// variable names are shown.
pub fn plan(config: &Configuration) -> Vec<PlannedStep> {
    let cli = config.clever_cli.as_str();
    let cwd = config.deploy_path.as_deref();
    let secrets = [config.token.as_str(), config.secret.as_str()];

    let mut steps = vec![PlannedStep {
        step: Step::Login,
        invocation: Invocation::new(cli, login_args(&config.token, &config.secret))
            .redacted(&secrets),
    }];

    let alias = match config.app_id.as_deref() {
        Some(app_id) => {
            steps.push(PlannedStep {
                step: Step::Link,
                invocation: Invocation::new(cli, link_args(app_id)).in_dir(cwd),
            });
            Some(app_id)
        }
        None => config.alias.as_deref(),
    };

    for name in config.extra_env.names() {
        steps.push(PlannedStep {
            step: Step::SetEnv,
            invocation: Invocation::new(cli, env_set_args(alias, name, REDACTED)).in_dir(cwd),
        });
    }

    steps.push(PlannedStep {
        step: Step::Deploy,
        invocation: Invocation::new(
            cli,
            deploy_args(alias, config.force, config.same_commit_policy.as_deref()),
        )
        .in_dir(cwd),
    });

    steps
}
