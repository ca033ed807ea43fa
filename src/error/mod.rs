//! Error handling and diagnostics for the gather runtime
//!
//! This module provides the error type shared by task admission, the
//! coordinator, configuration loading and the command-line driver.

use thiserror::Error;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Result type alias for gather operations
pub type GatherResult<T> = Result<T, GatherError>;

/// Main error type for the gather runtime
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatherError {
    /// The scheduler could not admit new tasks
    #[error("Scheduling Error: {message}")]
    SchedulingError {
        message: String,
    },
    /// A task specification or task batch was rejected before scheduling
    #[error("Invalid Input: {message}")]
    InvalidInput {
        message: String,
        /// Zero-based position of the offending task specification
        position: Option<usize>,
    },
    /// A configuration value could not be used
    #[error("Config Error: {message}")]
    ConfigError {
        message: String,
    },
    /// Internal runtime error (should not happen in normal operation)
    #[error("Internal Error: {message}")]
    InternalError {
        message: String,
    },
}

impl GatherError {
    /// Create a new scheduling error
    pub fn scheduling_error(message: impl Into<String>) -> Self {
        Self::SchedulingError {
            message: message.into(),
        }
    }

    /// Create a new input validation error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            position: None,
        }
    }

    /// Create a new input validation error pointing at one task specification
    pub fn invalid_input_at(message: impl Into<String>, position: usize) -> Self {
        Self::InvalidInput {
            message: message.into(),
            position: Some(position),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &str {
        match self {
            Self::SchedulingError { .. } => "Scheduling Error",
            Self::InvalidInput { .. } => "Invalid Input",
            Self::ConfigError { .. } => "Config Error",
            Self::InternalError { .. } => "Internal Error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        match self {
            Self::SchedulingError { message }
            | Self::InvalidInput { message, .. }
            | Self::ConfigError { message }
            | Self::InternalError { message } => message,
        }
    }

    /// Get the position of the offending task specification, if known
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::InvalidInput { position, .. } => *position,
            _ => None,
        }
    }

    /// Attach a task position to an input error that does not carry one yet
    pub fn at_position(self, position: usize) -> Self {
        match self {
            Self::InvalidInput { message, position: None } => Self::InvalidInput {
                message,
                position: Some(position),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = GatherError::scheduling_error("capacity exhausted");

        assert_eq!(err.kind(), "Scheduling Error");
        assert_eq!(err.message(), "capacity exhausted");
        assert_eq!(err.position(), None);
    }

    #[test]
    fn test_error_display() {
        let err = GatherError::invalid_input("task list is empty");
        assert_eq!(err.to_string(), "Invalid Input: task list is empty");

        let err = GatherError::config_error("GATHER_MAX_TASKS must be a positive integer");
        assert_eq!(
            err.to_string(),
            "Config Error: GATHER_MAX_TASKS must be a positive integer"
        );
    }

    #[test]
    fn test_at_position() {
        let err = GatherError::invalid_input("negative delay").at_position(3);
        assert_eq!(err.position(), Some(3));

        // an existing position is never overwritten
        let err = GatherError::invalid_input_at("negative delay", 1).at_position(3);
        assert_eq!(err.position(), Some(1));

        let err = GatherError::internal_error("join failed").at_position(3);
        assert_eq!(err.position(), None);
    }
}
