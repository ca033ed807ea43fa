//! # coop-gather
//!
//! A cooperative fan-out/join task runtime:
//! - Every task waits for its delay, then produces `"{label} data"`
//! - All tasks of a batch run interleaved on a single thread
//! - Results come back in the order the tasks were given, not the order they
//!   finished in
//!
//! ## Architecture
//!
//! - `task`: task specifications, task records and the simulated fetch
//! - `async_runtime`: the cooperative executor, async counter stream and
//!   scoped async resource
//! - `coordinator`: fan-out/join over the executor and the ordered `ResultSet`
//! - `config`: runtime configuration from defaults, environment and flags
//! - `logging`: `tracing` subscriber setup
//! - `error`: error handling and diagnostics
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use coop_gather::{FanOutJoinCoordinator, TaskSpec};
//!
//! let coordinator = FanOutJoinCoordinator::default();
//! let results = coordinator
//!     .run_blocking(&[
//!         TaskSpec::new(Duration::from_millis(20), "A"),
//!         TaskSpec::new(Duration::from_millis(10), "B"),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(results.into_vec(), vec!["A data", "B data"]);
//! ```

pub mod async_runtime;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod task;

// Re-export commonly used types
pub use config::RuntimeConfig;
pub use coordinator::{FanOutJoinCoordinator, ResultSet};
pub use error::{GatherError, GatherResult};
pub use task::{TaskSpec, TaskState};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a batch of tasks to completion with the given configuration
///
/// This is the main entry point for synchronous callers. It validates the
/// configuration, admits every task into a fresh coordinator and blocks until
/// all of them have completed.
///
/// # Arguments
///
/// * `tasks` - The task specifications, in the order results should come back
/// * `config` - Admission capacity and time unit
///
/// # Returns
///
/// Returns the ordered `ResultSet`, or a `GatherError` if the configuration
/// is invalid or the batch could not be scheduled.
pub fn gather(tasks: &[TaskSpec], config: &RuntimeConfig) -> GatherResult<ResultSet> {
    config.validate()?;

    let coordinator = FanOutJoinCoordinator::new(config);
    coordinator.run_blocking(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_gather_default_tasks() {
        let config = RuntimeConfig {
            time_unit: Duration::from_millis(10),
            ..RuntimeConfig::default()
        };
        let tasks = task::default_tasks(config.time_unit);

        let results = gather(&tasks, &config).unwrap();
        assert_eq!(results.into_vec(), vec!["task1 data", "task2 data"]);
    }

    #[test]
    fn test_gather_rejects_invalid_config() {
        let config = RuntimeConfig {
            max_tasks: 0,
            ..RuntimeConfig::default()
        };
        let tasks = vec![TaskSpec::new(Duration::ZERO, "a")];

        let err = gather(&tasks, &config).unwrap_err();
        assert_eq!(err.kind(), "Config Error");
    }
}
