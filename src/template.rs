//! Template expansion for prefix, postfix and replacement text
//!
//! Templates carry two kinds of placeholders:
//! - named placeholders such as `PREFIXER_LINENUMBER`, bound once per record
//! - the `$1` back-reference, which expands to the whole current record text
//!
//! Both are literal substring substitutions, not regex captures. Templates
//! come from the command line and are UTF-8; record text is raw bytes.

use memchr::memmem;

/// Magic token replaced with the record's starting line number
pub const LINE_NUMBER_TOKEN: &str = "PREFIXER_LINENUMBER";

/// Back-reference to the current record text in fallback replacements
pub const BACKREFERENCE: &str = "$1";

/// Literal escape that stands for a NUL byte in command-line arguments
pub const NUL_ESCAPE: &str = r"\x00";

/// Placeholder bindings for a single record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    bindings: Vec<(&'static str, String)>,
}

impl Placeholders {
    /// Bindings for one record; the line number is bound only when tracking
    pub fn for_record(line_number: Option<usize>) -> Self {
        let mut placeholders = Self::default();
        if let Some(line) = line_number {
            placeholders.bind(LINE_NUMBER_TOKEN, line.to_string());
        }
        placeholders
    }

    pub fn bind(&mut self, name: &'static str, value: String) {
        match self.bindings.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.bindings.push((name, value)),
        }
    }

    /// Replace every bound placeholder in `template`; unbound names stay literal.
    pub fn expand(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (name, value) in &self.bindings {
            if out.contains(name) {
                out = out.replace(name, value);
            }
        }
        out
    }
}

/// Replace every `$1` in `template` with `text`.
pub fn expand_backreference(template: &str, text: &[u8]) -> Vec<u8> {
    replace_all(template.as_bytes(), BACKREFERENCE.as_bytes(), text)
}

/// Byte-level counterpart of `str::replace`; `needle` must be non-empty.
pub fn replace_all(haystack: &[u8], needle: &[u8], with: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut last = 0;
    for pos in memmem::find_iter(haystack, needle) {
        out.extend_from_slice(&haystack[last..pos]);
        out.extend_from_slice(with);
        last = pos + needle.len();
    }
    out.extend_from_slice(&haystack[last..]);
    out
}

/// Convert each literal `\x00` into a NUL character.
pub fn decode_nul_escapes(s: &str) -> String {
    s.replace(NUL_ESCAPE, "\0")
}

/// Remove ANSI escape sequences, for equality comparisons only.
pub fn strip_ansi(text: &[u8]) -> Vec<u8> {
    strip_ansi_escapes::strip(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_line_number() {
        let p = Placeholders::for_record(Some(42));
        assert_eq!(p.expand("PREFIXER_LINENUMBER: "), "42: ");
        assert_eq!(p.expand("[PREFIXER_LINENUMBER|PREFIXER_LINENUMBER]"), "[42|42]");
    }

    #[test]
    fn test_unbound_token_stays_literal() {
        let p = Placeholders::for_record(None);
        assert_eq!(p.expand("PREFIXER_LINENUMBER: "), "PREFIXER_LINENUMBER: ");
    }

    #[test]
    fn test_bind_overwrites() {
        let mut p = Placeholders::for_record(Some(1));
        p.bind(LINE_NUMBER_TOKEN, "7".to_string());
        assert_eq!(p.expand(LINE_NUMBER_TOKEN), "7");
    }

    #[test]
    fn test_backreference_expands_every_occurrence() {
        assert_eq!(expand_backreference("[$1]", b"b"), b"[b]");
        assert_eq!(expand_backreference("$1-$1", b"ab"), b"ab-ab");
        assert_eq!(expand_backreference("none", b"ab"), b"none");
    }

    #[test]
    fn test_backreference_with_binary_text() {
        assert_eq!(expand_backreference("<$1>", b"\xff\0"), b"<\xff\0>");
    }

    #[test]
    fn test_replace_all_adjacent_matches() {
        assert_eq!(replace_all(b"aaa", b"aa", b"b"), b"ba");
        assert_eq!(replace_all(b"", b"x", b"y"), b"");
    }

    #[test]
    fn test_backreference_is_not_regex() {
        // $2 and ${1} are not special
        assert_eq!(expand_backreference("$2${1}", b"x"), b"$2${1}");
    }

    #[test]
    fn test_decode_nul_escapes() {
        assert_eq!(decode_nul_escapes(r"a\x00b"), "a\0b");
        assert_eq!(decode_nul_escapes(r"\x00\x00"), "\0\0");
        assert_eq!(decode_nul_escapes(r"\x01"), r"\x01");
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi(b"\x1b[31mred\x1b[0m"), b"red");
        assert_eq!(strip_ansi(b"plain"), b"plain");
    }
}
