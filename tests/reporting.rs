// tests/reporting.rs

use clever_deploy::cli::LogLevel;
use clever_deploy::logging::resolve_level;
use clever_deploy::report::{escape_data, failure_command};
use tracing::Level;

#[test]
fn failure_message_is_a_single_workflow_command() {
    assert_eq!(
        failure_command("Deployment failed with code 1"),
        "::error::Deployment failed with code 1"
    );
    assert_eq!(
        failure_command("line one\nline two"),
        "::error::line one%0Aline two"
    );
}

#[test]
fn escape_data_encodes_percent_first() {
    assert_eq!(escape_data("100%\r\n"), "100%25%0D%0A");
    assert_eq!(escape_data("%0A"), "%250A");
}

#[test]
fn log_level_precedence() {
    assert_eq!(resolve_level(None, None, None), Level::INFO);
    assert_eq!(resolve_level(None, None, Some("1")), Level::DEBUG);
    assert_eq!(resolve_level(None, None, Some("0")), Level::INFO);
    assert_eq!(resolve_level(None, Some("warn"), Some("1")), Level::WARN);
    assert_eq!(resolve_level(None, Some("bogus"), None), Level::INFO);
    assert_eq!(
        resolve_level(Some(LogLevel::Trace), Some("error"), Some("1")),
        Level::TRACE
    );
}
