//! Async executor implementation
//!
//! This module implements the cooperative task executor. Every admitted task
//! is spawned onto a single `LocalSet`, so exactly one task runs at a time
//! and tasks only interleave at their suspension points.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use tokio::task::{JoinHandle, LocalSet};

use crate::error::{GatherError, GatherResult};
use crate::task::{fetch, Task, TaskId, TaskSpec, TaskState};

/// Default number of tasks that may be in flight at once
pub const DEFAULT_CAPACITY: usize = 64;

/// Bookkeeping for every task the executor has admitted
#[derive(Debug, Default)]
struct TaskTable {
    tasks: Vec<Task>,
    completion_order: Vec<TaskId>,
    next_task_id: TaskId,
}

impl TaskTable {
    fn insert(&mut self, spec: &TaskSpec) -> TaskId {
        let task_id = self.next_task_id;
        self.next_task_id += 1;
        self.tasks.push(Task::new(task_id, spec));
        task_id
    }

    fn update_task_state(&mut self, task_id: TaskId, state: TaskState) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            task.state = state;
            if state == TaskState::Completed {
                self.completion_order.push(task_id);
            }
        }
    }

    fn in_flight(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_in_flight()).count()
    }
}

/// Single-threaded cooperative executor with a bounded number of task slots
pub struct AsyncExecutor {
    table: Rc<RefCell<TaskTable>>,
    local: LocalSet,
    capacity: usize,
}

impl AsyncExecutor {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: Rc::new(RefCell::new(TaskTable::default())),
            local: LocalSet::new(),
            capacity,
        }
    }

    /// Admit a whole batch of tasks, or none of them.
    ///
    /// Handles are returned in batch order. The tasks start running as soon
    /// as the executor is driven with [`AsyncExecutor::run_until`].
    pub fn admit(&self, batch: &[TaskSpec]) -> GatherResult<Vec<(TaskId, JoinHandle<String>)>> {
        self.check_capacity(batch.len())?;
        Ok(batch.iter().map(|spec| self.spawn_admitted(spec)).collect())
    }

    /// Admit a single task
    pub fn spawn(&self, spec: &TaskSpec) -> GatherResult<(TaskId, JoinHandle<String>)> {
        self.check_capacity(1)?;
        Ok(self.spawn_admitted(spec))
    }

    /// Drive the executor's tasks until `future` completes
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.local.run_until(future).await
    }

    fn check_capacity(&self, requested: usize) -> GatherResult<()> {
        let in_flight = self.in_flight();
        let fits = in_flight
            .checked_add(requested)
            .is_some_and(|total| total <= self.capacity);

        if !fits {
            tracing::warn!(requested, in_flight, capacity = self.capacity, "admission refused");
            return Err(GatherError::scheduling_error(format!(
                "cannot admit {} task(s): {} of {} slots in use",
                requested, in_flight, self.capacity
            )));
        }
        Ok(())
    }

    fn spawn_admitted(&self, spec: &TaskSpec) -> (TaskId, JoinHandle<String>) {
        let task_id = self.table.borrow_mut().insert(spec);
        tracing::debug!(task_id, label = %spec.label, delay = ?spec.delay, "task admitted");

        let table = Rc::clone(&self.table);
        let TaskSpec { delay, label } = spec.clone();
        let handle = self.local.spawn_local(async move {
            table.borrow_mut().update_task_state(task_id, TaskState::Running);
            let result = fetch(delay, &label).await;
            table.borrow_mut().update_task_state(task_id, TaskState::Completed);
            tracing::debug!(task_id, "task completed");
            result
        });

        (task_id, handle)
    }

    /// Maximum number of in-flight tasks
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of admitted tasks that have not completed yet
    pub fn in_flight(&self) -> usize {
        self.table.borrow().in_flight()
    }

    /// Get task by ID
    pub fn task(&self, task_id: TaskId) -> Option<Task> {
        self.table
            .borrow()
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
    }

    /// Snapshot of every task record, in admission order
    pub fn tasks(&self) -> Vec<Task> {
        self.table.borrow().tasks.clone()
    }

    /// Check if all tasks are complete
    pub fn all_tasks_complete(&self) -> bool {
        self.table
            .borrow()
            .tasks
            .iter()
            .all(|t| t.state == TaskState::Completed)
    }

    /// Get all completed tasks
    pub fn completed_tasks(&self) -> Vec<Task> {
        self.table
            .borrow()
            .tasks
            .iter()
            .filter(|t| t.state == TaskState::Completed)
            .cloned()
            .collect()
    }

    /// IDs of completed tasks, in the order they finished
    pub fn completion_order(&self) -> Vec<TaskId> {
        self.table.borrow().completion_order.clone()
    }

    /// Drop the records of completed tasks
    pub fn clear(&self) {
        let mut table = self.table.borrow_mut();
        table.tasks.retain(|t| t.is_in_flight());
        table.completion_order.clear();
    }

    /// Drop the records of tasks nobody will join, releasing their slots.
    ///
    /// The tasks themselves must already have been aborted.
    pub fn abandon(&self, task_ids: &[TaskId]) {
        let mut table = self.table.borrow_mut();
        table.tasks.retain(|t| !task_ids.contains(&t.id));
        tracing::debug!(count = task_ids.len(), "tasks abandoned");
    }
}

impl Default for AsyncExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
