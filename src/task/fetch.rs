//! Simulated fetch
//!
//! The body every admitted task runs.

use std::time::Duration;

use tokio::time::sleep;

/// Wait for `delay`, then return `"{label} data"`.
///
/// The sleep is the only suspension point: the task yields to the scheduler
/// once and resumes after at least `delay` has elapsed.
pub async fn fetch(delay: Duration, label: &str) -> String {
    tracing::info!(label, ?delay, "fetch started");
    sleep(delay).await;
    tracing::info!(label, "fetch finished");
    format!("{} data", label)
}
