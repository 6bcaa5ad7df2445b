//! Structured logging with `tracing`.
//!
//! Output goes to stderr so the interactive transcript on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Default filter when neither the settings nor `RUST_LOG` specify one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Build the filter: `RUST_LOG` if set, else `level`, else [`DEFAULT_LEVEL`]
/// when `level` is not a valid directive list.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global stderr subscriber.
///
/// Only the first call in a process installs anything; later calls are
/// ignored.
pub fn init_subscriber(level: &str) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level, "logging to stderr");
    }
}
