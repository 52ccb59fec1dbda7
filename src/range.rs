//! nth-expression ranges
//!
//! An nth-expression is a comma-separated list of 1-based, possibly negative,
//! possibly open-ended ranges, e.g. `..3,5,-2..`. It selects which records are
//! eligible for processing.

use crate::error::PrefixerError;
use regex::Regex;
use std::sync::LazyLock;

static ALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9,.\-]*$").expect("static regex"));

static RANGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?[0-9]+)?\.\.(-?[0-9]+)?$").expect("static regex"));

static SINGLE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("static regex"));

/// One side of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Unbounded on this side (first record for a begin, last record for an end)
    Open,
    /// 1-based position; negative values count from the end (-1 = last)
    At(i64),
}

impl Bound {
    /// Resolve to a 1-based position against `total` records.
    fn resolve(self, open: i64, total: i64) -> i64 {
        let value = match self {
            Bound::Open => open,
            Bound::At(v) => v,
        };
        if value < 0 { value + total + 1 } else { value }
    }
}

/// Inclusive range of record positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub begin: Bound,
    pub end: Bound,
}

impl Range {
    /// Build a range, canonicalizing a begin of `1` and an end of `-1` to `Open`.
    pub fn new(begin: Bound, end: Bound) -> Self {
        let begin = match begin {
            Bound::At(1) => Bound::Open,
            other => other,
        };
        let end = match end {
            Bound::At(-1) => Bound::Open,
            other => other,
        };
        Self { begin, end }
    }

    /// Check whether the 1-based `position` falls inside this range.
    pub fn contains(&self, total: usize, position: usize) -> bool {
        let total = total as i64;
        let position = position as i64;
        let begin = self.begin.resolve(1, total);
        let end = self.end.resolve(-1, total);
        begin <= position && position <= end
    }
}

/// Set of ranges; a position matches if any range covers it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<Range>,
}

impl RangeSet {
    /// Set with no restriction (matches every record)
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Parse an nth-expression such as `..2,4,-3..-1`.
    ///
    /// An empty expression yields the unrestricted set.
    pub fn parse(expr: &str) -> Result<Self, PrefixerError> {
        if !ALLOWED_CHARS.is_match(expr) {
            let bad = expr
                .chars()
                .find(|c| !(c.is_ascii_digit() || matches!(c, ',' | '.' | '-')))
                .unwrap_or('?');
            return Err(PrefixerError::invalid_range(
                expr,
                format!("unexpected character '{}'", bad),
            ));
        }

        if expr.is_empty() {
            return Ok(Self::unrestricted());
        }

        let ranges = expr
            .split(',')
            .map(|token| parse_token(expr, token))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn is_unrestricted(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Check whether the record at 0-based `index` out of `total` is selected.
    pub fn matches(&self, total: usize, index: usize) -> bool {
        if self.ranges.is_empty() {
            return true;
        }
        let position = index + 1;
        self.ranges.iter().any(|r| r.contains(total, position))
    }
}

fn parse_token(expr: &str, token: &str) -> Result<Range, PrefixerError> {
    if let Some(caps) = RANGE_TOKEN.captures(token) {
        let begin = match caps.get(1) {
            Some(m) => Bound::At(parse_bound(expr, m.as_str())?),
            None => Bound::Open,
        };
        let end = match caps.get(2) {
            Some(m) => Bound::At(parse_bound(expr, m.as_str())?),
            None => Bound::Open,
        };
        return Ok(Range::new(begin, end));
    }

    if SINGLE_TOKEN.is_match(token) {
        let n = parse_bound(expr, token)?;
        return Ok(Range::new(Bound::At(n), Bound::At(n)));
    }

    if token.is_empty() {
        return Err(PrefixerError::invalid_range(expr, "empty range"));
    }
    Err(PrefixerError::invalid_range(
        expr,
        format!("cannot parse range '{}'", token),
    ))
}

fn parse_bound(expr: &str, text: &str) -> Result<i64, PrefixerError> {
    let value: i64 = text
        .parse()
        .map_err(|_| PrefixerError::invalid_range(expr, format!("number out of range: {}", text)))?;
    if value == 0 {
        return Err(PrefixerError::invalid_range(
            expr,
            "0 is not a valid position (positions are 1-based)",
        ));
    }
    Ok(value)
}
