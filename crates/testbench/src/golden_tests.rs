// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn comparator() -> Comparator {
    Comparator::new(RuleSet::painted_nodes())
}

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

#[test]
fn file_compared_with_itself_has_no_diff() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "expected.dot", "digraph g {\n  A -> B;\n}\n");
    comparator().compare_files(&path, &path, None).unwrap();
}

#[test]
fn painted_current_file_matches_clean_expected() {
    let dir = TempDir::new().unwrap();
    let current = write(
        &dir,
        "current.dot",
        "A [flags=\"0x00000107\", fillcolor = \"green\"];\n",
    );
    let expected = write(
        &dir,
        "expected.dot",
        "A [flags=\"0x00000007\", fillcolor = \"white\"];\n",
    );
    comparator().compare_files(&current, &expected, None).unwrap();
}

#[test]
fn normalization_is_not_applied_to_expected_side() {
    let dir = TempDir::new().unwrap();
    let current = write(&dir, "current.dot", "A [fillcolor = \"white\"];\n");
    let expected = write(&dir, "expected.dot", "A [fillcolor = \"green\"];\n");
    let err = comparator()
        .compare_files(&current, &expected, None)
        .unwrap_err();
    assert!(matches!(err, TestbenchError::GoldenMismatch { .. }));
}

#[test]
fn exclusion_marker_drops_current_lines_only() {
    let dir = TempDir::new().unwrap();
    let current = write(&dir, "current.txt", "keep 1\n# generated 12:00\nkeep 2\n");
    let expected = write(&dir, "expected.txt", "keep 1\nkeep 2\n");
    comparator()
        .compare_files(&current, &expected, Some("generated"))
        .unwrap();
}

#[test]
fn crlf_expected_file_matches_lf_result() {
    let dir = TempDir::new().unwrap();
    let current = write(&dir, "current.txt", "a\nb\n");
    let expected = write(&dir, "expected.txt", "a\r\nb\r\n");
    comparator()
        .compare_files(&current, &expected, None)
        .unwrap();

    comparator()
        .compare_output(&lines("a\nb"), &expected, &CompareOptions::new())
        .unwrap();
}

#[test]
fn trailing_newline_difference_is_a_mismatch() {
    let dir = TempDir::new().unwrap();
    let current = write(&dir, "current.txt", "a\nb");
    let expected = write(&dir, "expected.txt", "a\nb\n");
    assert!(comparator()
        .compare_files(&current, &expected, None)
        .is_err());
}

#[test]
fn mismatch_carries_zero_context_diff_and_path() {
    let dir = TempDir::new().unwrap();
    let current = write(&dir, "current.txt", "one\ntwo\nthree\nfour\n");
    let expected = write(&dir, "expected.txt", "one\nTWO\nthree\nfour\n");

    let err = comparator()
        .compare_files(&current, &expected, None)
        .unwrap_err();
    match err {
        TestbenchError::GoldenMismatch {
            expected_path,
            diff,
        } => {
            assert_eq!(expected_path, expected);
            assert!(diff.contains("-two\n"));
            assert!(diff.contains("+TWO\n"));
            assert!(!diff.contains(" one"), "zero context expected:\n{diff}");
            assert!(!diff.contains(" three"), "zero context expected:\n{diff}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn output_matches_expected_file() {
    let dir = TempDir::new().unwrap();
    let expected = write(&dir, "expected.txt", "Node BLOCK_A\nNode BLOCK_IN0\n");
    comparator()
        .compare_output(
            &lines("Node BLOCK_A\nNode BLOCK_IN0"),
            &expected,
            &CompareOptions::new(),
        )
        .unwrap();
}

#[test]
fn exclude_field_ignores_volatile_suffix_on_both_sides() {
    let dir = TempDir::new().unwrap();
    let expected = write(
        &dir,
        "queue.txt",
        "Prio Low\n  Flow IN_C0 -> B VTIME: 0x0000000000000000\n",
    );
    let output = lines("Prio Low\n  Flow IN_C0 -> B VTIME: 0x17c3a0f1e2d00000");

    comparator()
        .compare_output(&output, &expected, &CompareOptions::new().exclude_field("VTIME:"))
        .unwrap();
}

#[test]
fn exclude_field_still_checks_prefix() {
    let dir = TempDir::new().unwrap();
    let expected = write(&dir, "queue.txt", "Flow IN_C0 -> A VTIME: 1\n");
    let output = lines("Flow IN_C0 -> B VTIME: 2");

    let err = comparator()
        .compare_output(&output, &expected, &CompareOptions::new().exclude_field("VTIME:"))
        .unwrap_err();
    assert!(matches!(err, TestbenchError::GoldenMismatch { .. }));
}

#[test]
fn delete_removes_indices_sequentially_on_both_sides() {
    let dir = TempDir::new().unwrap();
    // deleting 0 then 1 removes original lines 0 and 2
    let expected = write(&dir, "expected.txt", "ts 1\nsame\nts 2\nend\n");
    let output = lines("ts 9\nsame\nts 8\nend");

    comparator()
        .compare_output(&output, &expected, &CompareOptions::new().delete([0, 1]))
        .unwrap();
}

#[test]
fn delete_out_of_range_is_an_error() {
    let dir = TempDir::new().unwrap();
    let expected = write(&dir, "expected.txt", "a\n");
    let err = comparator()
        .compare_output(&lines("a"), &expected, &CompareOptions::new().delete([1]))
        .unwrap_err();
    assert!(matches!(
        err,
        TestbenchError::LineIndexOutOfRange { index: 1, len: 1 }
    ));
}

#[test]
fn output_exclusion_marker_applies_to_current_only() {
    let dir = TempDir::new().unwrap();
    let expected = write(&dir, "expected.txt", "a\nb\n");
    comparator()
        .compare_output(
            &lines("a\nDEBUG noise\nb"),
            &expected,
            &CompareOptions::new().exclude("DEBUG"),
        )
        .unwrap();
}

#[test]
fn missing_expected_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = comparator()
        .compare_output(&lines("a"), &dir.path().join("absent.txt"), &CompareOptions::new())
        .unwrap_err();
    assert!(matches!(err, TestbenchError::Io { .. }));
}

#[test]
fn unified_diff_is_none_for_equal_sides() {
    let a = ["x", "y"];
    assert_eq!(unified_diff(&a, &a, "a", "b"), None);
}

#[test]
fn empty_markers_are_ignored() {
    let options = CompareOptions::new().exclude("").exclude_field("");
    assert_eq!(options, CompareOptions::default());
}
