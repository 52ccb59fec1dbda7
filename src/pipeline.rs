//! Per-record transformation pipeline
//!
//! Each record moves through a fixed sequence of steps and leaves either as
//! one output record or as a drop:
//!
//! 1. eligibility (process-include range)
//! 2. trim
//! 3. remove-prefix
//! 4. skip-empty
//! 5. removal set (rm mode)
//! 6. location assignment
//! 7. replacement (replace mode), then skip-empty again
//! 8. prefix/postfix decoration
//!
//! Steps 2, 3, 5 and 7 and the decoration only apply to eligible records.

use crate::location::LocationTracker;
use crate::options::{Mode, TransformOptions};
use crate::output::{LocationLog, OutputAssembler};
use crate::splitter::{Record, split};
use crate::template::{Placeholders, expand_backreference, strip_ansi};
use std::borrow::Cow;

/// Bytes removed from both ends by `--trim`
const TRIM_BYTES: &[u8] = b" \t\n\r";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Decorated bytes to write
    Emit(Vec<u8>),
    /// Empty after trimming and prefix removal
    SkippedEmpty,
    /// Member of the removal set
    Removed,
    /// Empty after substitution
    EmptyAfterReplace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedRecord {
    pub outcome: RecordOutcome,
    /// Starting line, when tracking is on and the record reached location assignment
    pub location: Option<usize>,
}

/// Result of a full pass over the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub output: Vec<u8>,
    pub locations: LocationLog,
    pub records_in: usize,
    pub records_out: usize,
}

pub struct RecordPipeline<'a> {
    options: &'a TransformOptions,
}

impl<'a> RecordPipeline<'a> {
    pub fn new(options: &'a TransformOptions) -> Self {
        Self { options }
    }

    /// Split `input`, run every record through the pipeline, and join the survivors.
    pub fn run(&self, input: &[u8]) -> Transformed {
        let options = self.options;
        let records = split(input, options.input_separator.as_bytes());
        let total = records.len();
        tracing::debug!(records = total, "split input");

        let mut output = OutputAssembler::new(&options.output_separator);
        let mut locations = LocationLog::default();

        let tracker = records.iter().fold(
            LocationTracker::new(&options.input_separator),
            |tracker, record| {
                let (processed, tracker) = self.process_record(record, total, tracker);
                if let Some(line) = processed.location {
                    locations.record(line);
                }
                match processed.outcome {
                    RecordOutcome::Emit(text) => output.push(&text),
                    dropped => {
                        tracing::trace!(index = record.index, outcome = ?dropped, "record dropped");
                    }
                }
                tracker
            },
        );

        let records_out = output.emitted();
        tracing::debug!(
            records_in = total,
            records_out,
            last_line = tracker.line(),
            "pipeline finished"
        );

        Transformed {
            output: output.finish(),
            locations,
            records_in: total,
            records_out,
        }
    }

    /// Transform one record.
    ///
    /// `tracker` is the location state left by the previous record; the
    /// advanced state is returned alongside the result. Only records that
    /// reach location assignment add their embedded newlines; records
    /// dropped before it advance by the separator alone.
    pub fn process_record(
        &self,
        record: &Record<'_>,
        total: usize,
        tracker: LocationTracker,
    ) -> (ProcessedRecord, LocationTracker) {
        let options = self.options;
        let tracker = tracker.before_record(record.index);

        let eligible = options.process_include.matches(total, record.index);

        let mut current: &[u8] = record.raw;
        if eligible {
            if options.trim {
                current = trim_record(current);
            }
            current = current
                .strip_prefix(options.remove_prefix.as_bytes())
                .unwrap_or(current);
        }

        if options.skip_empty && current.is_empty() {
            return (dropped(RecordOutcome::SkippedEmpty, None), tracker);
        }

        if eligible {
            if let Mode::Remove { records } = &options.mode {
                let key = self.comparison_key(current);
                if as_key(&key).is_some_and(|k| records.contains(k)) {
                    return (dropped(RecordOutcome::Removed, None), tracker);
                }
            }
        }

        let location = options.tracks_location().then(|| tracker.line());
        let next = tracker.after_record(record.embedded_newlines);
        let placeholders = Placeholders::for_record(location);

        let mut text = Cow::Borrowed(current);
        if eligible {
            if let Mode::Replace { table, fallback } = &options.mode {
                let key = self.comparison_key(current);
                let replacement = match as_key(&key).and_then(|k| table.get(k)) {
                    Some(to) => Some(to.as_bytes().to_vec()),
                    None => fallback
                        .as_deref()
                        .filter(|t| !t.is_empty())
                        .map(|t| expand_backreference(&placeholders.expand(t), current)),
                };
                if let Some(replacement) = replacement {
                    if options.skip_empty && replacement.is_empty() {
                        return (dropped(RecordOutcome::EmptyAfterReplace, location), next);
                    }
                    text = Cow::Owned(replacement);
                }
            }
        }

        let decorated = if eligible {
            let prefix = placeholders.expand(&options.add_prefix);
            let postfix = placeholders.expand(&options.add_postfix);
            let mut out = Vec::with_capacity(prefix.len() + text.len() + postfix.len());
            out.extend_from_slice(prefix.as_bytes());
            out.extend_from_slice(&text);
            out.extend_from_slice(postfix.as_bytes());
            out
        } else {
            text.into_owned()
        };

        (
            ProcessedRecord {
                outcome: RecordOutcome::Emit(decorated),
                location,
            },
            next,
        )
    }

    /// Bytes used for rm/replace lookups
    fn comparison_key<'t>(&self, text: &'t [u8]) -> Cow<'t, [u8]> {
        if self.options.rm_ansi {
            Cow::Owned(strip_ansi(text))
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Lookup keys come from the command line, so only UTF-8 records can match.
fn as_key(key: &[u8]) -> Option<&str> {
    std::str::from_utf8(key).ok()
}

fn trim_record(text: &[u8]) -> &[u8] {
    let start = text
        .iter()
        .position(|b| !TRIM_BYTES.contains(b))
        .unwrap_or(text.len());
    let end = text
        .iter()
        .rposition(|b| !TRIM_BYTES.contains(b))
        .map_or(start, |i| i + 1);
    &text[start..end]
}

fn dropped(outcome: RecordOutcome, location: Option<usize>) -> ProcessedRecord {
    ProcessedRecord { outcome, location }
}

/// Run `options` over `input` in one pass.
pub fn transform(options: &TransformOptions, input: impl AsRef<[u8]>) -> Transformed {
    RecordPipeline::new(options).run(input.as_ref())
}
