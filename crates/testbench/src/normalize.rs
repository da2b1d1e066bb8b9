// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output normalization before golden comparison.
//!
//! Visualising a schedule paints visited nodes: it sets transient flag bits
//! and switches the fill colour and font of the node. Those attributes
//! differ between runs, so they are rewritten to their unpainted form
//! before diffing. Rules are exact substrings applied in order.

use crate::error::{Result, TestbenchError};

/// One exact-substring replacement
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub replacement: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Painted flag values and their unpainted counterparts.
const PAINTED_FLAGS: &[(&str, &str)] = &[
    (r#"flags="0x00000107""#, r#"flags="0x00000007""#),
    (r#"flags="0x00002107""#, r#"flags="0x00002007""#),
    (r#"flags="0x00108107""#, r#"flags="0x00108007""#),
    (r#"flags="0x00708107""#, r#"flags="0x00708007""#),
    (r#"flags="0x00100107""#, r#"flags="0x00100007""#),
    (r#"fillcolor = "green""#, r#"fillcolor = "white""#),
    (r#"flags="0x00020007""#, r#"flags="0x00000007""#),
    (r#"flags="0x00022007""#, r#"flags="0x00002007""#),
    (r#"flags="0x00120007""#, r#"flags="0x00100007""#),
    (r#"flags="0x00128007""#, r#"flags="0x00108007""#),
    (
        r#", fontname="Times-Bold", fontcolor = "blue2", fontsize="16""#,
        "",
    ),
];

/// Ordered list of rules
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// A rule set that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rules for dot output of painted schedules.
    pub fn painted_nodes() -> Self {
        Self {
            rules: PAINTED_FLAGS
                .iter()
                .map(|(p, r)| Rule::new(*p, *r))
                .collect(),
        }
    }

    /// Append a rule.
    ///
    /// Rejects rules that could make normalization non-idempotent: an empty
    /// pattern, or a replacement that reintroduces any pattern of the set.
    pub fn with_rule(mut self, rule: Rule) -> Result<Self> {
        let reintroduces = |replacement: &str, pattern: &str| replacement.contains(pattern);

        let conflict = rule.pattern.is_empty()
            || reintroduces(&rule.replacement, &rule.pattern)
            || self.rules.iter().any(|r| {
                reintroduces(&rule.replacement, &r.pattern)
                    || reintroduces(&r.replacement, &rule.pattern)
            });
        if conflict {
            return Err(TestbenchError::InvalidRule {
                pattern: rule.pattern,
                replacement: rule.replacement,
            });
        }

        self.rules.push(rule);
        Ok(self)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply the rules until the line stops changing.
    ///
    /// A single pass is enough for real dot output; further passes only run
    /// when a removal joined text into a new match. Every changing pass of a
    /// shrinking rule drops at least one byte, so the passes are bounded by
    /// the line length.
    pub fn apply_line(&self, line: &str) -> String {
        let mut current = self.pass(line);
        for _ in 0..=line.len() {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
        tracing::warn!(line = %line, "normalization did not settle");
        current
    }

    fn pass(&self, line: &str) -> String {
        self.rules.iter().fold(line.to_string(), |acc, rule| {
            if acc.contains(&rule.pattern) {
                acc.replace(&rule.pattern, &rule.replacement)
            } else {
                acc
            }
        })
    }

    /// Rewrite every line; count and order are preserved.
    pub fn apply<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines.iter().map(|l| self.apply_line(l.as_ref())).collect()
    }
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
