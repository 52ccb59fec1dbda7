//! prefixer: split a text stream into records, transform them, join them back
//!
//! This library exposes the record pipeline for the binary and for tests.
//! The main binary is at src/main.rs.

pub mod cli;
pub mod config;
pub mod error;
pub mod location;
pub mod logger;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod range;
pub mod splitter;
pub mod template;

// Re-export commonly used types for convenience
pub use error::PrefixerError;
pub use location::LocationTracker;
pub use options::{LocationSink, Mode, TransformOptions};
pub use output::{LocationLog, OutputAssembler};
pub use pipeline::{RecordOutcome, RecordPipeline, Transformed, transform};
pub use range::{Bound, Range, RangeSet};
pub use splitter::{Record, split};
