//! Async runtime module
//!
//! This module handles cooperative task execution: the executor tasks are
//! admitted into, plus the async counter stream and the scoped resource that
//! run on the same scheduler.

pub mod executor;
pub mod resource;
pub mod stream;

pub use executor::AsyncExecutor;
pub use resource::{AsyncResource, ResourceState};
pub use stream::counter;
