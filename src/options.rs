//! Immutable configuration for a single run

use crate::range::RangeSet;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Where collected line numbers go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationSink {
    /// Track line numbers but never write them
    Discard,
    File(PathBuf),
}

impl LocationSink {
    /// `/dev/null` enables tracking without writing a file
    pub fn from_path(path: &Path) -> Self {
        if path == Path::new("/dev/null") {
            LocationSink::Discard
        } else {
            LocationSink::File(path.to_path_buf())
        }
    }
}

/// Record selection mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Plain,
    /// Drop records equal to one of these strings
    Remove { records: HashSet<String> },
    /// Substitute records found in `table`; others go through `fallback` if set
    Replace {
        table: HashMap<String, String>,
        fallback: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub trim: bool,
    pub skip_empty: bool,
    /// Compare with ANSI escapes stripped in rm and replace modes
    pub rm_ansi: bool,
    pub add_prefix: String,
    pub add_postfix: String,
    pub remove_prefix: String,
    pub input_separator: String,
    pub output_separator: String,
    pub process_include: RangeSet,
    pub mode: Mode,
    /// `None` disables location tracking
    pub location: Option<LocationSink>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            trim: false,
            skip_empty: false,
            rm_ansi: false,
            add_prefix: String::new(),
            add_postfix: String::new(),
            remove_prefix: String::new(),
            input_separator: "\n".to_string(),
            output_separator: "\n".to_string(),
            process_include: RangeSet::unrestricted(),
            mode: Mode::Plain,
            location: None,
        }
    }
}

impl TransformOptions {
    pub fn tracks_location(&self) -> bool {
        self.location.is_some()
    }
}
