//! Output assembly and the location file

use crate::error::PrefixerError;
use crate::options::LocationSink;
use std::fs;
use std::io::{self, Write};

/// Joins surviving records with the output separator
#[derive(Debug, Clone)]
pub struct OutputAssembler {
    separator: Vec<u8>,
    buffer: Vec<u8>,
    emitted: usize,
}

impl OutputAssembler {
    pub fn new(separator: &str) -> Self {
        Self {
            separator: separator.as_bytes().to_vec(),
            buffer: Vec::new(),
            emitted: 0,
        }
    }

    /// Append a record, preceded by the separator unless it is the first one.
    pub fn push(&mut self, text: &[u8]) {
        if self.emitted > 0 {
            self.buffer.extend_from_slice(&self.separator);
        }
        self.buffer.extend_from_slice(text);
        self.emitted += 1;
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

/// Newline-terminated decimal line numbers, written once at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationLog {
    buffer: String,
    entries: usize,
}

impl LocationLog {
    pub fn record(&mut self, line: usize) {
        self.buffer.push_str(&line.to_string());
        self.buffer.push('\n');
        self.entries += 1;
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Write the buffer to `sink`. Does nothing for [`LocationSink::Discard`].
    pub fn flush(&self, sink: &LocationSink) -> Result<(), PrefixerError> {
        match sink {
            LocationSink::Discard => Ok(()),
            LocationSink::File(path) => {
                tracing::debug!(path = %path.display(), entries = self.entries, "writing location file");
                fs::write(path, self.buffer.as_bytes()).map_err(|source| {
                    PrefixerError::LocationWrite {
                        path: path.clone(),
                        source,
                    }
                })
            }
        }
    }
}

/// Write the joined records and flush.
pub fn write_output<W: Write>(mut writer: W, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_join_without_leading_separator() {
        let mut out = OutputAssembler::new(", ");
        out.push(b"a");
        out.push(b"b");
        out.push(b"");
        assert_eq!(out.emitted(), 3);
        assert_eq!(out.finish(), b"a, b, ");
    }

    #[test]
    fn test_empty_assembler() {
        assert!(OutputAssembler::new("\n").finish().is_empty());
    }

    #[test]
    fn test_location_log_format() {
        let mut log = LocationLog::default();
        log.record(1);
        log.record(4);
        assert_eq!(log.as_str(), "1\n4\n");
        assert_eq!(log.entries(), 2);
    }

    #[test]
    fn test_location_flush_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations.txt");
        let mut log = LocationLog::default();
        log.record(3);
        log.flush(&LocationSink::File(path.clone())).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "3\n");
    }

    #[test]
    fn test_location_flush_discard_writes_nothing() {
        let mut log = LocationLog::default();
        log.record(3);
        assert!(log.flush(&LocationSink::Discard).is_ok());
    }

    #[test]
    fn test_location_flush_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("locations.txt");
        let err = LocationLog::default()
            .flush(&LocationSink::File(path))
            .unwrap_err();
        assert!(matches!(err, PrefixerError::LocationWrite { .. }));
    }

    #[test]
    fn test_write_output() {
        let mut sink = Vec::new();
        write_output(&mut sink, b"a\xff\nb").unwrap();
        assert_eq!(sink, b"a\xff\nb");
    }
}
