use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub artist: String,
    pub track: String,
    /// Trimmed input line the item was parsed from.
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Item(WorkItem),
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success(PathBuf),
    /// Diagnostic message only, never written to the remainder file.
    Failure(String),
}

#[derive(Debug, Clone)]
pub struct JobResult {
    pub item: WorkItem,
    pub outcome: JobOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total_lines: usize,
    pub malformed: usize,
    pub attempted: usize,
    pub succeeded: usize,
    /// Original lines to retry, in the order they were recorded.
    pub failures: Vec<String>,
    /// `(line, reason)` pairs for the failures, for display only.
    pub diagnostics: Vec<(String, String)>,
}

impl BatchReport {
    pub fn unresolved(&self) -> usize {
        self.failures.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub finished_at: DateTime<Utc>,
    pub input: PathBuf,
    pub output: PathBuf,
    pub workers: usize,
    pub total_lines: usize,
    pub malformed: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub unresolved: usize,
}

#[derive(Tabled)]
pub struct FailureTableRow {
    pub line: String,
    pub reason: String,
}

#[derive(Tabled)]
pub struct RunRecordTableRow {
    pub field: String,
    pub value: String,
}
