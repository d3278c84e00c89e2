//! Scenario summary and reporting
//!
//! This module defines structures for tracking and reporting batch results.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one file of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Anonymized and written
    Success,
    /// Could not be read, parsed or written
    Error,
    /// Not started because shutdown was requested
    Skipped,
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedFile {
    /// Input path
    pub input: PathBuf,

    /// Output path (the input itself when overwriting)
    pub output: PathBuf,

    /// Outcome
    pub status: FileStatus,

    /// Number of personal-data fields found
    pub detections: usize,

    /// Error message for failed files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessedFile {
    /// A successfully processed file
    pub fn success(input: PathBuf, output: PathBuf, detections: usize) -> Self {
        Self {
            input,
            output,
            status: FileStatus::Success,
            detections,
            error: None,
        }
    }

    /// A failed file
    pub fn error(input: PathBuf, output: PathBuf, error: String) -> Self {
        Self {
            input,
            output,
            status: FileStatus::Error,
            detections: 0,
            error: Some(error),
        }
    }

    /// A file left untouched because of shutdown
    pub fn skipped(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            status: FileStatus::Skipped,
            detections: 0,
            error: None,
        }
    }
}

/// Summary of a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    /// Run identifier (matches the audit log)
    pub run_id: String,

    /// Per-file results, in input order
    pub processed_files: Vec<ProcessedFile>,

    /// Listed files that did not exist
    pub missing_files: Vec<PathBuf>,

    /// Ledger size after the run
    pub replacement_count: usize,

    /// Duration of the run
    #[serde(serialize_with = "serialize_duration_ms", rename = "duration_ms")]
    pub duration: Duration,

    /// Whether a shutdown signal interrupted the run
    pub interrupted: bool,
}

fn serialize_duration_ms<S: serde::Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(duration.as_millis() as u64)
}

impl ScenarioSummary {
    /// Create a new empty summary
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            processed_files: Vec::new(),
            missing_files: Vec::new(),
            replacement_count: 0,
            duration: Duration::from_secs(0),
            interrupted: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Number of files written successfully
    pub fn success_count(&self) -> usize {
        self.count(FileStatus::Success)
    }

    /// Number of files that failed
    pub fn error_count(&self) -> usize {
        self.count(FileStatus::Error)
    }

    /// Number of files skipped because of shutdown
    pub fn skipped_count(&self) -> usize {
        self.count(FileStatus::Skipped)
    }

    fn count(&self, status: FileStatus) -> usize {
        self.processed_files
            .iter()
            .filter(|f| f.status == status)
            .count()
    }

    /// Total personal-data fields found across successful files
    pub fn total_detections(&self) -> usize {
        self.processed_files.iter().map(|f| f.detections).sum()
    }

    /// Failed files
    pub fn failed_files(&self) -> impl Iterator<Item = &ProcessedFile> {
        self.processed_files
            .iter()
            .filter(|f| f.status == FileStatus::Error)
    }

    /// Whether every file succeeded
    pub fn is_successful(&self) -> bool {
        self.error_count() == 0 && !self.interrupted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        crate::log_scenario_complete!(
            self.run_id,
            self.success_count(),
            self.error_count(),
            self.replacement_count,
            self.duration.as_millis() as u64
        );

        for failed in self.failed_files() {
            tracing::warn!(
                input = %failed.input.display(),
                error = failed.error.as_deref().unwrap_or("unknown error"),
                "File failed"
            );
        }
        if self.interrupted {
            tracing::warn!(skipped = self.skipped_count(), "Scenario interrupted by shutdown");
        }
    }
}
