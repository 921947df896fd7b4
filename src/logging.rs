//! Log output for the CLI.
//!
//! Logs go to stderr so command output on stdout stays clean. The level is
//! read from `HERDVIEW_LOG` using `EnvFilter` syntax and defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "HERDVIEW_LOG";

/// Filter used when `HERDVIEW_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `HERDVIEW_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. `verbose` forces `debug` for this crate.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let mut filter = env_filter();
    if verbose {
        if let Ok(directive) = "herdview=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false);
        init(true);
    }
}
