//! Error types for prefixer
//!
//! The transformation pipeline itself is total; only the boundaries can fail:
//! parsing the process-include expression, reading input, loading the config
//! file, and writing the location file.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefixerError {
    /// The `--process-include` expression does not follow the nth-expression grammar
    #[error("invalid range expression '{expression}': {reason}")]
    InvalidRangeExpression { expression: String, reason: String },

    /// Reading the input stream failed
    #[error("failed to read input: {0}")]
    InputRead(#[source] io::Error),

    /// Writing the location file failed (records were already written)
    #[error("{}", location_write_message(.path, .source))]
    LocationWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file exists but could not be used
    #[error("config file '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl PrefixerError {
    pub fn invalid_range(expression: &str, reason: impl Into<String>) -> Self {
        PrefixerError::InvalidRangeExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}

/// Build an actionable message for a failed location file write
fn location_write_message(path: &Path, err: &io::Error) -> String {
    let base = format!("Failed to write location file: '{}'", path.display());
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string());

    match err.kind() {
        io::ErrorKind::PermissionDenied => format!(
            "{}\n\n\
             Cause: Permission denied\n\n\
             Possible fixes:\n\
             1. Check write permissions on '{}'\n\
             2. Choose a location file in a writable directory\n\
             3. Use --location /dev/null to track line numbers without writing them",
            base, parent_dir
        ),
        io::ErrorKind::NotFound => format!(
            "{}\n\n\
             Cause: Parent directory does not exist\n\n\
             Possible fixes:\n\
             1. Create the directory first: mkdir -p '{}'\n\
             2. Use an absolute path for the location file",
            base, parent_dir
        ),
        _ => format!("{}\n\nUnderlying error: {}", base, err),
    }
}
