//! Debug logging support for prefixer
//!
//! Logs go to stderr so they never mix with the record stream on stdout.
//! Logging is enabled by a non-empty `DEBUGME` environment variable or by
//! `debug = true` in the `[logging]` section of the config file.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

/// Environment variable that turns on debug logging
pub const DEBUG_ENV: &str = "DEBUGME";

/// Check the environment for the debug switch
pub fn debug_requested() -> bool {
    std::env::var_os(DEBUG_ENV).is_some_and(|v| !v.is_empty())
}

/// Initialize the logging system
///
/// Returns false when logging stays disabled. `RUST_LOG` refines the filter
/// when set; otherwise everything from this crate at debug level is shown.
pub fn init_logging(debug_enabled: bool) -> Result<bool> {
    if !debug_enabled {
        return Ok(false);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prefixer=debug"));

    let subscriber = registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(true)
}
