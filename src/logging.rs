//! Logging setup
//!
//! The library only emits through the `log` macros; binaries pick the
//! backend. `RUST_LOG` always overrides the default filter.

use anyhow::{Context, Result};

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Install env_logger as the global logger
pub fn init(debug: bool) -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter(debug)))
        .format_timestamp_millis()
        .try_init()
        .context("Logger was already initialized")
}
