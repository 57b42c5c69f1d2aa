// tests/pipeline_timeout.rs

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout, Instant};

use clever_deploy::fs::mock::MockFileSystem;
use clever_deploy::pipeline::Pipeline;
use clever_deploy::types::DeployOutcome;
use clever_deploy_test_utils::buffer::SharedBuffer;
use clever_deploy_test_utils::builders::ConfigBuilder;
use clever_deploy_test_utils::fake_runner::FakeRunner;
use clever_deploy_test_utils::{capture_logs, init_tracing};

type TestResult = Result<(), Box<dyn Error>>;

fn pipeline(
    config: clever_deploy::config::Configuration,
    runner: &FakeRunner,
) -> Pipeline<FakeRunner> {
    Pipeline::new(config, runner.clone())
        .with_fs(Arc::new(MockFileSystem::new()))
        .with_console(SharedBuffer::new().boxed())
}

#[tokio::test]
async fn slow_deploy_times_out_without_failing() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new()
        .with_delay("deploy", Duration::from_secs(30))
        .with_exit_code("deploy", 42);
    let config = ConfigBuilder::new().timeout_ms(50).build();

    let started = Instant::now();
    let outcome = timeout(Duration::from_secs(5), pipeline(config, &runner).run()).await??;

    assert_eq!(outcome, DeployOutcome::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(5));
    // The deploy was started but never awaited to completion.
    assert_eq!(runner.args().last().map(|a| a[0].as_str()), Some("deploy"));
    assert!(!runner.finished().contains(&"deploy".to_string()));
    Ok(())
}

#[tokio::test]
async fn timed_out_deploy_keeps_running_detached() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new().with_delay("deploy", Duration::from_millis(300));
    let config = ConfigBuilder::new().timeout_ms(20).build();

    let outcome = pipeline(config, &runner).run().await?;
    assert_eq!(outcome, DeployOutcome::TimedOut);

    // The abandoned invocation was not cancelled: it still completes.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(runner.finished().contains(&"deploy".to_string()));
    Ok(())
}

#[tokio::test]
async fn fast_failing_deploy_still_fails_with_timeout() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new().with_exit_code("deploy", 42);
    let config = ConfigBuilder::new().timeout_ms(10_000).build();

    let err = pipeline(config, &runner)
        .run()
        .await
        .expect_err("deploy finished first with a nonzero code");

    assert_eq!(err.to_string(), "Deployment failed with code 42");
    Ok(())
}

#[tokio::test]
async fn fast_deploy_completes_with_timeout() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new();
    let config = ConfigBuilder::new().timeout_ms(10_000).build();

    let outcome = pipeline(config, &runner).run().await?;

    assert_eq!(outcome, DeployOutcome::Completed);
    Ok(())
}

#[tokio::test]
async fn timeout_does_not_bound_steps_before_deploy() -> TestResult {
    init_tracing();
    let runner = FakeRunner::new()
        .with_delay("login", Duration::from_millis(150))
        .with_delay("env", Duration::from_millis(100));
    let config = ConfigBuilder::new()
        .timeout_ms(50)
        .env("FOO", "foo")
        .build();

    let outcome = pipeline(config, &runner).run().await?;

    assert_eq!(outcome, DeployOutcome::Completed);
    assert_eq!(runner.finished(), vec!["login", "env", "deploy"]);
    Ok(())
}

#[tokio::test]
async fn timing_out_is_reported_in_the_logs() -> TestResult {
    init_tracing();
    let (logs, _guard) = capture_logs();
    let runner = FakeRunner::new().with_delay("deploy", Duration::from_secs(30));
    let config = ConfigBuilder::new().timeout_ms(20).build();

    let outcome = pipeline(config, &runner).run().await?;

    assert_eq!(outcome, DeployOutcome::TimedOut);
    let text = logs.text();
    assert!(text.contains("INFO"), "{text}");
    assert!(text.contains("Deployment timed out, moving on with workflow run"));
    Ok(())
}

#[tokio::test]
async fn completed_deploy_does_not_report_a_timeout() -> TestResult {
    init_tracing();
    let (logs, _guard) = capture_logs();
    let config = ConfigBuilder::new().timeout_ms(10_000).build();

    pipeline(config, &FakeRunner::new()).run().await?;

    assert!(!logs.text().contains("timed out"));
    Ok(())
}
