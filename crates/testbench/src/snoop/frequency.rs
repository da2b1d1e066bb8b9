// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-value frequency of snooped timing messages.

use crate::error::{Result, TestbenchError};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Column holding the timing message parameter in snoop output.
pub const DEFAULT_VALUE_COLUMN: usize = 20;

const DATE_COLUMN: usize = 1;
const TIME_COLUMN: usize = 2;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Values marking late or colliding deliveries; rows are padded so these line up.
const DELAYED_MARKER: &str = "!delayed";
const CONFLICT_MARKER: &str = "!conflict";

/// Occurrences of each value in one capture
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrequencyTable {
    counts: BTreeMap<String, usize>,
    total: usize,
    first: Option<NaiveDateTime>,
    last: Option<NaiveDateTime>,
}

impl FrequencyTable {
    /// Tally `column` of a space-delimited capture file.
    pub fn from_csv(path: &Path, column: usize) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| TestbenchError::io(path, e))?;
        Self::from_reader(file, column)
    }

    pub fn from_reader<R: Read>(reader: R, column: usize) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut table = Self::default();
        for (index, record) in csv.records().enumerate() {
            let line = index + 1;
            let record = record.map_err(|e| TestbenchError::MalformedRow {
                line,
                reason: e.to_string(),
            })?;
            let field = |i: usize| {
                record.get(i).ok_or_else(|| TestbenchError::MalformedRow {
                    line,
                    reason: format!("missing column {}", i),
                })
            };
            let timestamp = parse_timestamp(field(DATE_COLUMN)?, field(TIME_COLUMN)?)
                .map_err(|reason| TestbenchError::MalformedRow { line, reason })?;
            let value = field(column)?;
            table.add(value, timestamp);
        }
        Ok(table)
    }

    fn add(&mut self, value: &str, timestamp: NaiveDateTime) {
        *self.counts.entry(value.to_string()).or_insert(0) += 1;
        self.total += 1;
        self.first = Some(self.first.map_or(timestamp, |t| t.min(timestamp)));
        self.last = Some(self.last.map_or(timestamp, |t| t.max(timestamp)));
    }

    /// Counts sorted by value.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Number of rows read.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Latest minus earliest timestamp, in seconds; zero for an empty capture.
    pub fn span_secs(&self) -> f64 {
        match (self.first, self.last) {
            (Some(first), Some(last)) => (last - first)
                .num_microseconds()
                .map_or(0.0, |us| us as f64 / 1_000_000.0),
            _ => 0.0,
        }
    }

    /// `count` per second over the span; undefined for a zero span.
    pub fn rate(&self, count: usize) -> Option<f64> {
        let span = self.span_secs();
        (span > 0.0).then(|| count as f64 / span)
    }

    /// Rate of one value in Hz.
    pub fn frequency(&self, value: &str) -> Option<f64> {
        self.rate(self.count(value))
    }

    /// Column-aligned table of value, count and rate, ending with an `All` row.
    pub fn render(&self) -> String {
        let key_width = self
            .counts
            .keys()
            .map(|k| k.chars().count())
            .fold("Value".len(), usize::max)
            + 1;
        let count_width = self
            .counts
            .values()
            .map(|c| c.to_string().len())
            .fold("Count".len().max(self.total.to_string().len()), usize::max);
        let align_markers = self
            .counts
            .keys()
            .any(|k| k.contains(DELAYED_MARKER) || k.contains(CONFLICT_MARKER));

        let mut out = format!(
            "{:^kw$}  {:>cw$}   {:>9}\n",
            "Value",
            "Count",
            "Frequency",
            kw = key_width,
            cw = count_width
        );
        for (key, count) in &self.counts {
            let mut aligned = key.clone();
            if align_markers && !key.contains('!') {
                aligned.push_str("         ");
            }
            if key.contains(DELAYED_MARKER) {
                aligned.push(' ');
            }
            out.push_str(&format!(
                "{:>kw$}: {:cw$} {}Hz\n",
                aligned,
                count,
                self.rate_column(*count),
                kw = key_width,
                cw = count_width
            ));
        }
        out.push_str(&format!(
            "{:>kw$}: {:cw$} {}Hz, time span: {:.6}sec\n",
            "All",
            self.total,
            self.rate_column(self.total),
            self.span_secs(),
            kw = key_width,
            cw = count_width
        ));
        out
    }

    fn rate_column(&self, count: usize) -> String {
        match self.rate(count) {
            Some(rate) => format!("{:9.3}", rate),
            None => format!("{:>9}", "-"),
        }
    }
}

/// Parse the date and time columns, dropping digits below microseconds.
pub fn parse_timestamp(date: &str, time: &str) -> std::result::Result<NaiveDateTime, String> {
    let time = match time.split_once('.') {
        Some((whole, fraction)) if fraction.len() > 6 => match fraction.get(..6) {
            Some(micros) => format!("{}.{}", whole, micros),
            None => time.to_string(),
        },
        _ => time.to_string(),
    };
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), TIMESTAMP_FORMAT)
        .map_err(|e| format!("bad timestamp '{} {}': {}", date, time, e))
}

#[cfg(test)]
#[path = "frequency_tests.rs"]
mod tests;
