//! Splitting raw input into records
//!
//! Input is handled as bytes end to end, so records that are not valid
//! UTF-8 pass through unchanged.

use memchr::memmem;

/// One unit of input between separator occurrences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    /// 0-based position in the split sequence
    pub index: usize,
    /// Bytes as extracted, before any transformation
    pub raw: &'a [u8],
    /// Count of `\n` inside `raw`
    pub embedded_newlines: usize,
}

impl<'a> Record<'a> {
    pub fn new(index: usize, raw: &'a [u8]) -> Self {
        Self {
            index,
            raw,
            embedded_newlines: count_newlines(raw),
        }
    }
}

pub fn count_newlines(text: &[u8]) -> usize {
    memchr::memchr_iter(b'\n', text).count()
}

/// Split `input` on every literal occurrence of `separator`.
///
/// `k` occurrences produce `k + 1` records, keeping empty records at the
/// boundaries. An empty separator yields one record per character; bytes
/// that do not form valid UTF-8 become records of their own.
pub fn split<'a>(input: &'a [u8], separator: &[u8]) -> Vec<Record<'a>> {
    if separator.is_empty() {
        return split_chars(input)
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Record::new(i, raw))
            .collect();
    }

    let mut records = Vec::new();
    let mut start = 0;
    for pos in memmem::find_iter(input, separator) {
        records.push(Record::new(records.len(), &input[start..pos]));
        start = pos + separator.len();
    }
    records.push(Record::new(records.len(), &input[start..]));
    records
}

fn split_chars(input: &[u8]) -> Vec<&[u8]> {
    let mut pieces = Vec::new();
    let mut rest = input;
    for chunk in input.utf8_chunks() {
        let widths = chunk
            .valid()
            .chars()
            .map(char::len_utf8)
            .chain(chunk.invalid().iter().map(|_| 1));
        for width in widths {
            let (piece, tail) = rest.split_at(width);
            pieces.push(piece);
            rest = tail;
        }
    }
    pieces
}
