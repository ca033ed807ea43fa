//! Logging setup
//!
//! Events are emitted with `tracing`; the binary installs a formatting
//! subscriber filtered by `GATHER_LOG` (e.g. `GATHER_LOG=coop_gather=debug`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
pub const LOG_VAR: &str = "GATHER_LOG";

/// Filter used when `GATHER_LOG` is unset or invalid
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "info");
        assert_eq!(default_filter(true), "debug");
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
        tracing::info!("still logging");
    }
}
