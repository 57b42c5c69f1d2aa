// tests/resolve_inputs.rs

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clever_deploy::config::resolve;
use clever_deploy::errors::DeployError;
use clever_deploy::inputs::mock::MockInputs;
use clever_deploy::inputs::{input_env_name, InputSource};
use clever_deploy_test_utils::{capture_logs, init_tracing};

type TestResult = Result<(), Box<dyn Error>>;

/// Inputs as the runtime provides them by default.
fn defaults() -> MockInputs {
    MockInputs::new()
        .with_input("force", "false")
        .with_input("quiet", "false")
        .with_credentials()
}

#[test]
fn fails_without_credentials() {
    init_tracing();

    let err = resolve(&MockInputs::new(), None).expect_err("no credentials");
    assert!(matches!(err, DeployError::MissingCredential("CLEVER_TOKEN")));
    assert_eq!(
        err.to_string(),
        "Missing CLEVER_TOKEN environment variable: https://err.sh/47ng/actions-clever-cloud/env"
    );

    let only_token = MockInputs::new().with_env("CLEVER_TOKEN", "token");
    let err = resolve(&only_token, None).expect_err("no secret");
    assert!(matches!(err, DeployError::MissingCredential("CLEVER_SECRET")));
}

#[test]
fn empty_credentials_count_as_missing() {
    init_tracing();
    let inputs = MockInputs::new()
        .with_env("CLEVER_TOKEN", "")
        .with_env("CLEVER_SECRET", "secret");

    assert!(matches!(
        resolve(&inputs, None),
        Err(DeployError::MissingCredential("CLEVER_TOKEN"))
    ));
}

#[test]
fn credentials_come_from_the_environment_not_inputs() {
    init_tracing();
    let inputs = MockInputs::new()
        .with_input("CLEVER_TOKEN", "token")
        .with_input("CLEVER_SECRET", "secret");

    assert!(resolve(&inputs, None).is_err());
}

#[test]
fn obtains_credentials_and_defaults() -> TestResult {
    init_tracing();

    let config = resolve(&defaults(), None)?;

    assert_eq!(config.token, "token");
    assert_eq!(config.secret, "secret");
    assert_eq!(config.alias, None);
    assert_eq!(config.app_id, None);
    assert!(!config.force);
    assert!(!config.quiet);
    assert_eq!(config.timeout, None);
    assert_eq!(config.deploy_path, None);
    assert_eq!(config.log_file, None);
    assert_eq!(config.same_commit_policy, None);
    assert!(config.extra_env.is_empty());
    assert_eq!(config.clever_cli, "clever");
    Ok(())
}

#[test]
fn absent_booleans_default_to_false() -> TestResult {
    init_tracing();
    let config = resolve(&MockInputs::new().with_credentials(), None)?;
    assert!(!config.force);
    assert!(!config.quiet);
    Ok(())
}

#[test]
fn boolean_inputs_accept_core_schema_spellings() -> TestResult {
    init_tracing();
    for (raw, expected) in [
        ("true", true),
        ("True", true),
        ("TRUE", true),
        ("false", false),
        ("False", false),
        ("FALSE", false),
        ("  true  ", true),
    ] {
        let config = resolve(&defaults().with_input("force", raw), None)?;
        assert_eq!(config.force, expected, "force={raw:?}");
        let config = resolve(&defaults().with_input("quiet", raw), None)?;
        assert_eq!(config.quiet, expected, "quiet={raw:?}");
    }
    Ok(())
}

#[test]
fn invalid_boolean_is_a_hard_failure() {
    init_tracing();

    for raw in ["nope", "yes", "1", "tRuE"] {
        match resolve(&defaults().with_input("force", raw), None) {
            Err(DeployError::InvalidBoolean { input, value }) => {
                assert_eq!(input, "force");
                assert_eq!(value, raw);
            }
            other => panic!("Expected InvalidBoolean for {raw:?}, got: {other:?}"),
        }
    }
}

#[test]
fn timeout_parsing() -> TestResult {
    init_tracing();

    let cases = [
        ("1800", Some(Duration::from_millis(1800))),
        ("1800ms", Some(Duration::from_millis(1800))),
        (" 42", Some(Duration::from_millis(42))),
        ("nope", None),
        ("0", None),
        ("-5", None),
        ("", None),
    ];
    for (raw, expected) in cases {
        let config = resolve(&defaults().with_input("timeout", raw), None)?;
        assert_eq!(
            config.timeout.map(|t| t.duration()),
            expected,
            "timeout={raw:?}"
        );
    }
    Ok(())
}

#[test]
fn string_inputs_are_passed_through() -> TestResult {
    init_tracing();
    let inputs = defaults()
        .with_input("appID", "app_facade42-cafe-babe-cafe-deadf00dbaad")
        .with_input("alias", "my-app")
        .with_input("deployPath", "./packages/backend")
        .with_input("logFile", "/some/path")
        .with_input("sameCommitPolicy", "restart");

    let config = resolve(&inputs, Some("/opt/clever/bin/clever"))?;

    assert_eq!(
        config.app_id.as_deref(),
        Some("app_facade42-cafe-babe-cafe-deadf00dbaad")
    );
    assert_eq!(config.alias.as_deref(), Some("my-app"));
    assert_eq!(config.deploy_path, Some(PathBuf::from("./packages/backend")));
    assert_eq!(config.log_file, Some(PathBuf::from("/some/path")));
    assert_eq!(config.same_commit_policy.as_deref(), Some("restart"));
    assert_eq!(config.clever_cli, "/opt/clever/bin/clever");
    Ok(())
}

#[test]
fn multiline_extra_env_block() -> TestResult {
    init_tracing();
    let inputs = defaults().with_input(
        "setEnv",
        "
  FOO=foo
  BAR=bar

  # empty line or comment is ignored
  lowercase=blah
  123=456
  many_equals=dod==d=doodod=d
",
    );

    let env = resolve(&inputs, None)?.extra_env;

    assert_eq!(env.get("FOO"), Some("foo"));
    assert_eq!(env.get("BAR"), Some("bar"));
    assert_eq!(env.get("lowercase"), Some("blah"));
    assert_eq!(env.get("123"), Some("456"));
    assert_eq!(env.get("many_equals"), Some("dod==d=doodod=d"));
    assert!(!env.contains("EVIL"));
    assert_eq!(
        env.names().collect::<Vec<_>>(),
        vec!["FOO", "BAR", "lowercase", "123", "many_equals"]
    );
    Ok(())
}

#[test]
fn prefixed_entries_filtered_by_allow_list() -> TestResult {
    init_tracing();
    let inputs = defaults()
        .with_env("INPUT_SETENV_FOO", "foo")
        .with_env("INPUT_SETENV_BAR", "bar")
        .with_env("INPUT_SETENV_EVIL", "rm -rf /")
        .with_input("extraEnvSafelist", "FOO, BAR");

    let env = resolve(&inputs, None)?.extra_env;

    assert_eq!(env.len(), 2);
    assert_eq!(env.get("FOO"), Some("foo"));
    assert_eq!(env.get("BAR"), Some("bar"));
    assert!(!env.contains("EVIL"));
    Ok(())
}

#[test]
fn prefixed_entries_without_allow_list_all_pass() -> TestResult {
    init_tracing();
    let inputs = defaults()
        .with_env("INPUT_SETENV_FOO", "foo")
        .with_env("INPUT_SETENV_EVIL", "evil");

    let env = resolve(&inputs, None)?.extra_env;

    assert_eq!(env.names().collect::<Vec<_>>(), vec!["EVIL", "FOO"]);
    Ok(())
}

#[test]
fn prefixed_entries_override_block_values_in_place() -> TestResult {
    init_tracing();
    let inputs = defaults()
        .with_input("setEnv", "A=1\nB=2")
        .with_env("INPUT_SETENV_A", "override");

    let env = resolve(&inputs, None)?.extra_env;

    assert_eq!(
        env.iter().collect::<Vec<_>>(),
        vec![("A", "override"), ("B", "2")]
    );
    Ok(())
}

#[test]
fn resolving_twice_yields_identical_configurations() -> TestResult {
    init_tracing();
    let inputs = defaults()
        .with_input("appID", "app_X")
        .with_input("timeout", "1000")
        .with_input("setEnv", "FOO=foo\nBAR=bar")
        .with_env("INPUT_SETENV_BAZ", "baz");

    assert_eq!(resolve(&inputs, None)?, resolve(&inputs, None)?);
    Ok(())
}

#[test]
fn input_names_map_to_runtime_variables() {
    assert_eq!(input_env_name("deployPath"), "INPUT_DEPLOYPATH");
    assert_eq!(input_env_name("my input"), "INPUT_MY_INPUT");

    let inputs = MockInputs::new().with_env("INPUT_ALIAS", "   ");
    assert_eq!(inputs.input("alias"), None, "blank inputs are absent");
}

#[test]
fn debug_output_redacts_credentials() -> TestResult {
    init_tracing();
    let inputs = MockInputs::new()
        .with_env("CLEVER_TOKEN", "super-token")
        .with_env("CLEVER_SECRET", "super-secret")
        .with_input("setEnv", "DB_PASSWORD=hunter2");

    let rendered = format!("{:?}", resolve(&inputs, None)?);

    assert!(!rendered.contains("super-token"));
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("DB_PASSWORD"));
    Ok(())
}

#[test]
fn extra_env_names_are_logged_without_values() -> TestResult {
    init_tracing();
    let (logs, _guard) = capture_logs();
    let inputs = defaults()
        .with_input("setEnv", "DB_PASSWORD=hunter2\nAPI_URL=https://internal.example")
        .with_env("INPUT_SETENV_SESSION_KEY", "k3y-v4lue");

    resolve(&inputs, None)?;

    let text = logs.text();
    assert!(text.contains("Setting extra environment variables:"));
    for name in ["DB_PASSWORD", "API_URL", "SESSION_KEY"] {
        assert!(text.contains(name), "{name} missing from logs:\n{text}");
    }
    for value in ["hunter2", "https://internal.example", "k3y-v4lue"] {
        assert!(!text.contains(value), "{value} leaked into logs:\n{text}");
    }
    Ok(())
}
