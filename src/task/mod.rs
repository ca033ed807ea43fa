//! Task definitions
//!
//! A task is one unit of simulated I/O-bound work: it waits for its delay and
//! then produces a result tagged with its label.

use std::fmt;
use std::time::Duration;

use crate::error::{GatherError, GatherResult};

pub mod fetch;

pub use fetch::fetch;

/// Task ID for tracking admitted tasks
pub type TaskId = usize;

/// Task state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
}

/// The `(delay, label)` pair a task is created from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub delay: Duration,
    pub label: String,
}

impl TaskSpec {
    pub fn new(delay: Duration, label: impl Into<String>) -> Self {
        Self {
            delay,
            label: label.into(),
        }
    }

    /// Build a spec whose delay is a number of time units
    pub fn from_units(units: f64, unit: Duration, label: impl Into<String>) -> GatherResult<Self> {
        if !units.is_finite() {
            return Err(GatherError::invalid_input(format!(
                "delay must be a finite number, got {}",
                units
            )));
        }
        if units < 0.0 {
            return Err(GatherError::invalid_input(format!(
                "delay must not be negative, got {}",
                units
            )));
        }

        let delay = Duration::try_from_secs_f64(unit.as_secs_f64() * units).map_err(|e| {
            GatherError::invalid_input(format!("delay of {} units is out of range: {}", units, e))
        })?;

        Ok(Self::new(delay, label))
    }

    /// Parse `LABEL:DELAY` or `LABEL=DELAY`, with DELAY in time units
    ///
    /// The last separator wins, so labels may themselves contain `:` or `=`.
    pub fn parse(text: &str, unit: Duration) -> GatherResult<Self> {
        let Some(split) = text.rfind(|c: char| c == ':' || c == '=') else {
            return Err(GatherError::invalid_input(format!(
                "expected LABEL:DELAY, got '{}'",
                text
            )));
        };

        let label = text[..split].trim();
        let delay = text[split + 1..].trim();

        if label.is_empty() {
            return Err(GatherError::invalid_input(format!(
                "task '{}' has an empty label",
                text
            )));
        }

        let units: f64 = delay.parse().map_err(|_| {
            GatherError::invalid_input(format!("'{}' is not a valid delay", delay))
        })?;

        Self::from_units(units, unit, label)
    }

    /// Parse a list of task specifications, reporting the position of the first bad one
    pub fn parse_all<S: AsRef<str>>(texts: &[S], unit: Duration) -> GatherResult<Vec<Self>> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Self::parse(text.as_ref(), unit).map_err(|e| e.at_position(i)))
            .collect()
    }
}

impl fmt::Display for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.label, self.delay)
    }
}

/// The task list the driver runs when none is given: two fetches where the
/// second one finishes first.
pub fn default_tasks(unit: Duration) -> Vec<TaskSpec> {
    vec![
        TaskSpec::new(unit * 2, "task1"),
        TaskSpec::new(unit, "task2"),
    ]
}

/// An admitted task
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub label: String,
    pub delay: Duration,
    pub state: TaskState,
}

impl Task {
    pub fn new(id: TaskId, spec: &TaskSpec) -> Self {
        Self {
            id,
            label: spec.label.clone(),
            delay: spec.delay,
            state: TaskState::Pending,
        }
    }

    /// Pending and Running tasks still hold a scheduler slot
    pub fn is_in_flight(&self) -> bool {
        !matches!(self.state, TaskState::Completed)
    }
}
