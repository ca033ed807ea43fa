//! Fan-out/join coordinator
//!
//! The coordinator admits a batch of tasks into its executor, lets them run
//! interleaved on one thread, and joins on all of them. Results come back in
//! the order the tasks were given, whatever order they finished in.

use tokio::runtime::Builder;
use tokio::task::{AbortHandle, JoinHandle};

use crate::async_runtime::AsyncExecutor;
use crate::config::RuntimeConfig;
use crate::error::{GatherError, GatherResult};
use crate::task::{TaskId, TaskSpec};

pub mod result_set;

pub use result_set::ResultSet;

/// Launches tasks concurrently and collects their results in launch order
pub struct FanOutJoinCoordinator {
    executor: AsyncExecutor,
}

impl FanOutJoinCoordinator {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self::with_capacity(config.max_tasks)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            executor: AsyncExecutor::new(capacity),
        }
    }

    /// The executor tasks are admitted into
    pub fn executor(&self) -> &AsyncExecutor {
        &self.executor
    }

    /// Run every task concurrently and return their results in input order.
    ///
    /// All tasks are admitted before any of them runs; if the batch does not
    /// fit the executor, nothing is started and a scheduling error is
    /// returned. An empty batch is rejected. Must be awaited on a tokio
    /// runtime with the time driver enabled.
    ///
    /// Dropping the returned future before it completes aborts the tasks of
    /// this run and releases their slots.
    pub async fn run_all(&self, tasks: &[TaskSpec]) -> GatherResult<ResultSet> {
        if tasks.is_empty() {
            return Err(GatherError::invalid_input("task list is empty"));
        }

        // records of earlier runs go with their result sets
        self.executor.clear();

        let handles = self.executor.admit(tasks)?;
        tracing::info!(count = handles.len(), "tasks launched");

        let mut guard = RunGuard::new(&self.executor, &handles);
        let values = self.executor.run_until(join_in_order(handles)).await?;
        guard.disarm();
        tracing::info!(count = values.len(), "all tasks completed");

        Ok(ResultSet::new(values))
    }

    /// Like [`run_all`](Self::run_all), driven on a dedicated current-thread
    /// runtime. Must not be called from within another tokio runtime.
    pub fn run_blocking(&self, tasks: &[TaskSpec]) -> GatherResult<ResultSet> {
        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| GatherError::scheduling_error(format!("failed to start scheduler: {}", e)))?;

        runtime.block_on(self.run_all(tasks))
    }
}

impl Default for FanOutJoinCoordinator {
    fn default() -> Self {
        Self::new(&RuntimeConfig::default())
    }
}

/// Aborts and forgets the tasks of a run that did not finish joining
struct RunGuard<'a> {
    executor: &'a AsyncExecutor,
    tasks: Vec<(TaskId, AbortHandle)>,
}

impl<'a> RunGuard<'a> {
    fn new(executor: &'a AsyncExecutor, handles: &[(TaskId, JoinHandle<String>)]) -> Self {
        Self {
            executor,
            tasks: handles
                .iter()
                .map(|(task_id, handle)| (*task_id, handle.abort_handle()))
                .collect(),
        }
    }

    fn disarm(&mut self) {
        self.tasks.clear();
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        tracing::warn!(count = self.tasks.len(), "run dropped before completion, aborting its tasks");
        for (_, handle) in &self.tasks {
            handle.abort();
        }
        let task_ids: Vec<TaskId> = self.tasks.iter().map(|(task_id, _)| *task_id).collect();
        self.executor.abandon(&task_ids);
    }
}

/// Await every handle in creation order. Later tasks keep running while an
/// earlier one is awaited, so this finishes when the slowest task does.
async fn join_in_order(handles: Vec<(TaskId, JoinHandle<String>)>) -> GatherResult<Vec<String>> {
    let mut values = Vec::with_capacity(handles.len());
    for (task_id, handle) in handles {
        let value = handle.await.map_err(|e| {
            GatherError::internal_error(format!("task {} did not complete: {}", task_id, e))
        })?;
        values.push(value);
    }
    Ok(values)
}
