// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Golden reference comparison.
//!
//! The current side is filtered and normalized, the expected file is read
//! as-is, and any difference is reported as a zero-context unified diff.

use crate::error::{Result, TestbenchError};
use crate::normalize::RuleSet;
use similar::TextDiff;
use std::path::Path;

/// Filters applied before comparing captured output
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Drop current lines containing this marker
    pub exclude: Option<String>,

    /// Cut both sides just after the first occurrence of this marker
    pub exclude_field: Option<String>,

    /// Line indices removed from both sides, in order, each against the
    /// already shortened sequence
    pub delete: Vec<usize>,
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude(mut self, marker: impl Into<String>) -> Self {
        self.exclude = Some(marker.into()).filter(|m: &String| !m.is_empty());
        self
    }

    pub fn exclude_field(mut self, marker: impl Into<String>) -> Self {
        self.exclude_field = Some(marker.into()).filter(|m: &String| !m.is_empty());
        self
    }

    pub fn delete(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.delete = indices.into();
        self
    }
}

/// Compares current results with golden files
#[derive(Clone, Debug, Default)]
pub struct Comparator {
    rules: RuleSet,
}

impl Comparator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Compare a result file with an expected file.
    ///
    /// Both files are read with `\r\n` and lone `\r` turned into `\n`; a
    /// missing final newline still counts as a difference.
    pub fn compare_files(&self, current: &Path, expected: &Path, exclude: Option<&str>) -> Result<()> {
        let current_text = read(current)?;
        let expected_text = read(expected)?;

        let kept: Vec<&str> = current_text
            .split_inclusive('\n')
            .filter(|line| !contains_marker(line, exclude))
            .collect();
        let current_lines = self.rules.apply(&kept);
        let expected_lines: Vec<&str> = expected_text.split_inclusive('\n').collect();

        check(&current_lines, &expected_lines, current, expected)
    }

    /// Compare captured output lines with an expected file.
    pub fn compare_output<S: AsRef<str>>(
        &self,
        output: &[S],
        expected: &Path,
        options: &CompareOptions,
    ) -> Result<()> {
        let mut current: Vec<String> = output
            .iter()
            .map(|l| l.as_ref())
            .filter(|line| !contains_marker(line, options.exclude.as_deref()))
            .map(str::to_string)
            .collect();
        delete_lines(&mut current, &options.delete)?;
        if let Some(ref field) = options.exclude_field {
            truncate_after(&mut current, field);
        }
        let current = self.rules.apply(&current);

        let expected_text = read(expected)?;
        let mut expected_lines: Vec<String> = expected_text.lines().map(str::to_string).collect();
        delete_lines(&mut expected_lines, &options.delete)?;
        if let Some(ref field) = options.exclude_field {
            truncate_after(&mut expected_lines, field);
        }

        check(&current, &expected_lines, Path::new("output"), expected)
    }
}

/// Zero-context unified diff, or `None` when both sides are equal.
pub fn unified_diff<A: AsRef<str>, B: AsRef<str>>(
    current: &[A],
    expected: &[B],
    current_label: &str,
    expected_label: &str,
) -> Option<String> {
    let current: Vec<&str> = current.iter().map(AsRef::as_ref).collect();
    let expected: Vec<&str> = expected.iter().map(AsRef::as_ref).collect();
    if current == expected {
        return None;
    }

    let diff = TextDiff::from_slices(&current, &expected);
    Some(
        diff.unified_diff()
            .context_radius(0)
            .missing_newline_hint(false)
            .header(current_label, expected_label)
            .to_string(),
    )
}

fn check<A: AsRef<str>, B: AsRef<str>>(
    current: &[A],
    expected: &[B],
    current_path: &Path,
    expected_path: &Path,
) -> Result<()> {
    let current_label = current_path.display().to_string();
    let expected_label = expected_path.display().to_string();
    match unified_diff(current, expected, &current_label, &expected_label) {
        None => Ok(()),
        Some(diff) => {
            tracing::warn!(expected = %expected_label, "golden mismatch");
            Err(TestbenchError::GoldenMismatch {
                expected_path: expected_path.to_path_buf(),
                diff,
            })
        }
    }
}

/// Read a text file with universal newlines.
fn read(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| TestbenchError::io(path, e))?;
    Ok(if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    })
}

fn contains_marker(line: &str, marker: Option<&str>) -> bool {
    marker.is_some_and(|m| !m.is_empty() && line.contains(m))
}

fn delete_lines(lines: &mut Vec<String>, indices: &[usize]) -> Result<()> {
    for &index in indices {
        if index >= lines.len() {
            return Err(TestbenchError::LineIndexOutOfRange {
                index,
                len: lines.len(),
            });
        }
        lines.remove(index);
    }
    Ok(())
}

fn truncate_after(lines: &mut [String], field: &str) {
    for line in lines.iter_mut() {
        if let Some(pos) = line.find(field) {
            line.truncate(pos + field.len());
        }
    }
}

#[cfg(test)]
#[path = "golden_tests.rs"]
mod tests;
