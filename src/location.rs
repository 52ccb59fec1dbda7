//! Source line tracking
//!
//! The tracker is a plain value folded through the record loop: each step
//! takes the tracker by value and hands back the advanced one.

use crate::splitter::count_newlines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationTracker {
    /// Line on which the next record starts
    line: usize,
    /// Newlines consumed by a single separator occurrence
    separator_newlines: usize,
}

impl LocationTracker {
    pub fn new(separator: &str) -> Self {
        Self {
            line: 1,
            separator_newlines: count_newlines(separator.as_bytes()),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Account for the separator that precedes record `index`.
    #[must_use]
    pub fn before_record(self, index: usize) -> Self {
        if index == 0 {
            return self;
        }
        Self {
            line: self.line + self.separator_newlines,
            ..self
        }
    }

    /// Account for the newlines inside a record's original text.
    #[must_use]
    pub fn after_record(self, embedded_newlines: usize) -> Self {
        Self {
            line: self.line + embedded_newlines,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_line_one() {
        assert_eq!(LocationTracker::new("\n").line(), 1);
    }

    #[test]
    fn test_first_record_has_no_separator_advance() {
        let tracker = LocationTracker::new("\n\n").before_record(0);
        assert_eq!(tracker.line(), 1);
    }

    #[test]
    fn test_separator_and_embedded_newlines() {
        // "x\ny\n\nz" split on "\n\n"
        let tracker = LocationTracker::new("\n\n").before_record(0);
        assert_eq!(tracker.line(), 1);
        let tracker = tracker.after_record(1).before_record(1);
        assert_eq!(tracker.line(), 4);
    }

    #[test]
    fn test_separator_without_newlines() {
        let tracker = LocationTracker::new(",")
            .before_record(0)
            .after_record(0)
            .before_record(1)
            .after_record(2)
            .before_record(2);
        assert_eq!(tracker.line(), 3);
    }
}
