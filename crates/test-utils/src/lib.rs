pub mod buffer;
pub mod builders;
pub mod fake_runner;

use std::sync::Once;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::buffer::SharedBuffer;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Route events emitted on the current thread into a buffer, at debug level
/// and without colors, until the returned guard is dropped.
///
/// `#[tokio::test]` runs on a current-thread runtime, so events from spawned
/// tasks are captured too.
pub fn capture_logs() -> (SharedBuffer, DefaultGuard) {
    let logs = SharedBuffer::new();
    let writer = logs.clone();
    let subscriber = fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
