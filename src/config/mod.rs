//! Runtime configuration
//!
//! Values start at their defaults, are overridden by environment variables,
//! and finally by command-line flags.

use std::time::Duration;

use crate::async_runtime::executor::DEFAULT_CAPACITY;
use crate::error::{GatherError, GatherResult};

/// Environment variable holding the admission capacity
pub const MAX_TASKS_VAR: &str = "GATHER_MAX_TASKS";

/// Environment variable holding the length of one delay unit in milliseconds
pub const UNIT_MS_VAR: &str = "GATHER_UNIT_MS";

/// Default length of one delay unit
pub const DEFAULT_TIME_UNIT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Maximum number of tasks in flight at once
    pub max_tasks: usize,
    /// Wall-clock length of one delay unit
    pub time_unit: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_tasks: DEFAULT_CAPACITY,
            time_unit: DEFAULT_TIME_UNIT,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> GatherResult<Self> {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    /// Override fields from the variables `lookup` knows about
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> GatherResult<Self> {
        if let Some(value) = lookup(MAX_TASKS_VAR) {
            self.max_tasks = parse_max_tasks(&value)
                .map_err(|e| GatherError::config_error(format!("{}: {}", MAX_TASKS_VAR, e.message())))?;
        }
        if let Some(value) = lookup(UNIT_MS_VAR) {
            self.time_unit = parse_unit_ms(&value)
                .map_err(|e| GatherError::config_error(format!("{}: {}", UNIT_MS_VAR, e.message())))?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> GatherResult<()> {
        if self.max_tasks == 0 {
            return Err(GatherError::config_error("max tasks must be at least 1"));
        }
        if self.time_unit.is_zero() {
            return Err(GatherError::config_error("time unit must be longer than zero"));
        }
        Ok(())
    }
}

/// Parse an admission capacity
pub fn parse_max_tasks(value: &str) -> GatherResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(GatherError::config_error(format!(
            "expected a positive integer, got '{}'",
            value
        ))),
    }
}

/// Parse a time unit given in milliseconds
pub fn parse_unit_ms(value: &str) -> GatherResult<Duration> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(GatherError::config_error(format!(
            "expected a positive number of milliseconds, got '{}'",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default().with_env(env(&[])).unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.time_unit, Duration::from_secs(1));
    }

    #[test]
    fn test_env_overrides() {
        let config = RuntimeConfig::default()
            .with_env(env(&[(MAX_TASKS_VAR, "3"), (UNIT_MS_VAR, "250")]))
            .unwrap();

        assert_eq!(
            config,
            RuntimeConfig {
                max_tasks: 3,
                time_unit: Duration::from_millis(250),
            }
        );
    }

    #[test]
    fn test_bad_env_values() {
        let err = RuntimeConfig::default()
            .with_env(env(&[(MAX_TASKS_VAR, "0")]))
            .unwrap_err();
        assert_eq!(err.kind(), "Config Error");
        assert!(err.message().starts_with(MAX_TASKS_VAR));

        let err = RuntimeConfig::default()
            .with_env(env(&[(UNIT_MS_VAR, "fast")]))
            .unwrap_err();
        assert!(err.message().starts_with(UNIT_MS_VAR));
    }

    #[test]
    fn test_validate() {
        let config = RuntimeConfig {
            max_tasks: 1,
            time_unit: Duration::ZERO,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_max_tasks(" 12 ").unwrap(), 12);
        assert!(parse_max_tasks("-1").is_err());
        assert_eq!(parse_unit_ms("5").unwrap(), Duration::from_millis(5));
        assert!(parse_unit_ms("0").is_err());
    }
}
