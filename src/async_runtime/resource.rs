//! Scoped async resource
//!
//! A resource that needs to suspend both when it is entered and when it is
//! left. [`AsyncResource::scope`] runs a body between the two.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Lifecycle of an [`AsyncResource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    Idle,
    Entered,
    Exited,
}

#[derive(Debug)]
pub struct AsyncResource {
    name: String,
    settle: Duration,
    state: ResourceState,
    transitions: Vec<ResourceState>,
}

impl AsyncResource {
    pub fn new(name: impl Into<String>, settle: Duration) -> Self {
        Self {
            name: name.into(),
            settle,
            state: ResourceState::Idle,
            transitions: vec![ResourceState::Idle],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Every state the resource has been in, oldest first
    pub fn transitions(&self) -> &[ResourceState] {
        &self.transitions
    }

    /// Enter the resource, run `body`, then exit and return the body's value
    pub async fn scope<F, Fut, T>(&mut self, body: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        sleep(self.settle).await;
        self.transition(ResourceState::Entered);
        tracing::info!(resource = %self.name, "enter");

        let value = body().await;

        tracing::info!(resource = %self.name, "exit");
        sleep(self.settle).await;
        self.transition(ResourceState::Exited);

        value
    }

    fn transition(&mut self, state: ResourceState) {
        self.state = state;
        self.transitions.push(state);
    }
}
