// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture log implementation.

use crate::entry::{CaptureEntry, CommandLine, Outcome};
use chrono::Utc;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Thread-safe record of every subprocess run.
///
/// Clones share the same underlying storage, so a clone handed to the snoop
/// worker records into the same sequence as the foreground.
pub struct CaptureLog {
    start: Instant,
    entries: Arc<Mutex<Vec<CaptureEntry>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl CaptureLog {
    /// Create a new in-memory capture log
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
        }
    }

    /// Create a capture log that also mirrors every entry to a JSONL file
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            start: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        })
    }

    /// Record a run and return its sequence number
    pub fn record(&self, command: CommandLine, outcome: Outcome) -> u64 {
        let mut entries = self.entries.lock();
        let seq = entries.len() as u64;
        let entry = CaptureEntry {
            seq,
            timestamp: Utc::now(),
            elapsed_ms: self.start.elapsed().as_millis() as u64,
            command,
            outcome,
        };

        // Written under the entries lock so the file keeps sequence order.
        if let Some(ref writer) = self.file_writer {
            let mut w = writer.lock();
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }

        entries.push(entry);
        seq
    }

    /// All recorded entries
    pub fn entries(&self) -> Vec<CaptureEntry> {
        self.entries.lock().clone()
    }

    /// The last N entries, oldest first
    pub fn last(&self, n: usize) -> Vec<CaptureEntry> {
        let all = self.entries.lock();
        all.iter().rev().take(n).rev().cloned().collect()
    }

    /// Count entries matching a predicate
    pub fn count<F: Fn(&CaptureEntry) -> bool>(&self, pred: F) -> usize {
        self.entries.lock().iter().filter(|e| pred(e)).count()
    }

    /// Entries whose argument list contains `subcommand`
    pub fn find_by_subcommand(&self, subcommand: &str) -> Vec<CaptureEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.command.has_arg(subcommand))
            .cloned()
            .collect()
    }

    /// Entries that did not complete with return code 0
    pub fn failures(&self) -> Vec<CaptureEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| !e.outcome.is_success())
            .cloned()
            .collect()
    }

    /// Human-readable command history, one `#seq [code] command` per line
    pub fn transcript(&self) -> String {
        let entries = self.entries.lock();
        let mut out = String::new();
        for e in entries.iter() {
            let code = match e.outcome.code() {
                Some(c) => c.to_string(),
                None => "spawn failed".to_string(),
            };
            out.push_str(&format!("#{} [{}] {}\n", e.seq, code, e.command));
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Clear all recorded entries
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for CaptureLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CaptureLog {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            entries: Arc::clone(&self.entries),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
        }
    }
}

impl std::fmt::Debug for CaptureLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureLog")
            .field("len", &self.len())
            .field("mirrored", &self.file_writer.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
