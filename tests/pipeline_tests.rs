//! End-to-end tests: command line in, joined records and location file out

use std::fs;
use tempfile::TempDir;

use prefixer::cli::parse_args_from;
use prefixer::config::Config;
use prefixer::output::write_output;
use prefixer::{PrefixerError, TransformOptions, transform};

fn options_for(args: &[&str]) -> TransformOptions {
    let mut argv = vec!["prefixer"];
    argv.extend_from_slice(args);
    parse_args_from(argv)
        .unwrap()
        .into_options(&Config::default())
        .unwrap()
}

#[test]
fn test_rm_mode_end_to_end() {
    let options = options_for(&["rm", "--", "drop"]);
    let result = transform(&options, "keep\ndrop\nkeep2");
    assert_eq!(result.output, b"keep\nkeep2");
}

#[test]
fn test_replace_table_hit_and_fallback() {
    let options = options_for(&["replace", "--replace", "[$1]", "--", "a", "A"]);
    let result = transform(&options, "a\nb\nc");
    assert_eq!(result.output, b"A\n[b]\n[c]");
}

#[test]
fn test_location_file_for_multiline_records() {
    let temp_dir = TempDir::new().unwrap();
    let loc_path = temp_dir.path().join("locations.txt");
    let options = options_for(&["-i", "\n\n", "-l", loc_path.to_str().unwrap()]);

    let result = transform(&options, "x\ny\n\nz");
    result.locations.flush(options.location.as_ref().unwrap()).unwrap();

    assert_eq!(result.output, b"x\ny\nz");
    assert_eq!(fs::read_to_string(&loc_path).unwrap(), "1\n4\n");
}

#[test]
fn test_location_magic_token_in_prefix_and_postfix() {
    let options = options_for(&["-l", "/dev/null", "-a", "PREFIXER_LINENUMBER:", "-p", " (PREFIXER_LINENUMBER)"]);
    let result = transform(&options, "a\nb");
    assert_eq!(result.output, b"1:a (1)\n2:b (2)");
}

#[test]
fn test_location_skips_records_dropped_before_assignment() {
    let temp_dir = TempDir::new().unwrap();
    let loc_path = temp_dir.path().join("loc");
    let options = options_for(&["-s", "-l", loc_path.to_str().unwrap(), "rm", "--", "b"]);

    let result = transform(&options, "a\n\nb\nc");
    result.locations.flush(options.location.as_ref().unwrap()).unwrap();

    assert_eq!(result.output, b"a\nc");
    assert_eq!(fs::read_to_string(&loc_path).unwrap(), "1\n4\n");
}

#[test]
fn test_process_include_leaves_other_records_untouched() {
    // `2..` is checked as index + 1 >= 2, so 0-based records 1..=3 are processed
    let options = options_for(&["--process-include", "2..", "-r", "x", "-a", "+"]);
    let result = transform(&options, "x0\nx1\nx2\nx3");
    assert_eq!(result.output, b"x0\n+1\n+2\n+3");
}

#[test]
fn test_process_include_negative_range() {
    let options = options_for(&["--process-include", "..-2", "-p", ";"]);
    let result = transform(&options, "a\nb\nc");
    assert_eq!(result.output, b"a;\nb;\nc");
}

#[test]
fn test_invalid_process_include_is_rejected_before_processing() {
    let err = parse_args_from(["prefixer", "--process-include", "1..x"])
        .unwrap()
        .into_options(&Config::default())
        .unwrap_err();
    assert!(matches!(err, PrefixerError::InvalidRangeExpression { .. }));
}

#[test]
fn test_nul_separated_input() {
    let options = options_for(&["-i", r"\x00", "-o", ",", "-s"]);
    let result = transform(&options, "a\0b\0");
    assert_eq!(result.output, b"a,b");
}

#[test]
fn test_binary_input_is_returned_byte_for_byte() {
    let input: &[u8] = b"a\xff\0b";
    let options = options_for(&["-i", r"\x00", "-o", r"\x00"]);
    let result = transform(&options, input);
    assert_eq!(result.records_in, 2);
    assert_eq!(result.output, input);

    let mut written = Vec::new();
    write_output(&mut written, &result.output).unwrap();
    assert_eq!(written, input);
}

#[test]
fn test_trim_and_skip_empty_list() {
    let options = options_for(&["-t", "-s", "-i", ",", "-o", "\n"]);
    let result = transform(&options, " a , b ,, c\n");
    assert_eq!(result.output, b"a\nb\nc");
}

#[test]
fn test_rm_ansi_end_to_end() {
    let options = options_for(&["--rm-ansi", "rm", "--", "warn"]);
    let result = transform(&options, "\x1b[33mwarn\x1b[0m\ninfo");
    assert_eq!(result.output, b"info");
}

#[test]
fn test_replace_to_empty_with_skip_empty() {
    let options = options_for(&["-s", "replace", "--", "noise", ""]);
    let result = transform(&options, "a\nnoise\nb");
    assert_eq!(result.output, b"a\nb");
}

#[test]
fn test_location_write_failure_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let loc_path = temp_dir.path().join("missing").join("loc");
    let options = options_for(&["-l", loc_path.to_str().unwrap()]);

    let result = transform(&options, "a");
    // Records are produced regardless; only the location write fails.
    assert_eq!(result.output, b"a");
    let err = result
        .locations
        .flush(options.location.as_ref().unwrap())
        .unwrap_err();
    assert!(matches!(err, PrefixerError::LocationWrite { .. }));
}
