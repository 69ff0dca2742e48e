//! Logging setup
//!
//! Installs a `tracing_subscriber` formatter. `RUST_LOG` takes precedence
//! over the configured level.

use crate::config::LogLevel;
use tracing_subscriber::EnvFilter;

/// Build the filter used by [`init`]
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
}

/// Initialize logging
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(level: LogLevel) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Logging initialized at {:?}", level);
    }
    installed
}
