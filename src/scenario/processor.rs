//! Scenario processor - drives the anonymization engine across a batch
//!
//! Every file of a scenario is rewritten through one engine, so all of them
//! share one ledger and a value met in several files gets one replacement.
//! A file that cannot be read, parsed or written is recorded as failed and
//! the rest of the batch carries on.

use crate::anonymization::{AnonymizationEngine, AnonymizedDocument, Ledger, LedgerSnapshot};
use crate::domain::{AnonymockError, Result, ResultExt};
use crate::scenario::summary::{ProcessedFile, ScenarioSummary};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Default number of files processed at the same time
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Batch coordinator for Wiremock mapping files
pub struct ScenarioProcessor {
    engine: Arc<AnonymizationEngine>,
    concurrency: usize,
    shutdown_signal: Option<watch::Receiver<bool>>,
}

impl ScenarioProcessor {
    /// Create a processor around an engine
    pub fn new(engine: AnonymizationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            concurrency: DEFAULT_CONCURRENCY,
            shutdown_signal: None,
        }
    }

    /// Set how many files are processed at the same time (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Stop starting new files once the signal turns `true`
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// The shared engine
    pub fn engine(&self) -> &AnonymizationEngine {
        &self.engine
    }

    /// Recursively collect `*.json` files under `dir`, sorted by path
    pub async fn find_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![dir.to_path_buf()];

        while let Some(current) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&current)
                .await
                .with_context(|| format!("Failed to read directory {}", current.display()))?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() && is_json_file(&path) {
                    files.push(path);
                }
            }
        }

        files.sort();
        tracing::debug!(dir = %dir.display(), count = files.len(), "Discovered JSON files");
        Ok(files)
    }

    /// Anonymize one file
    ///
    /// Without `output` the input file is overwritten. Nothing is written in
    /// dry-run mode.
    ///
    /// # Errors
    ///
    /// Returns [`AnonymockError::SourceRead`] when the file cannot be read or
    /// is not valid JSON, and [`AnonymockError::Io`] when the result cannot be
    /// written.
    pub async fn process_file(&self, input: &Path, output: Option<&Path>) -> Result<AnonymizedDocument> {
        crate::log_document_start!(input.display());

        let document = Self::read_document(input).await?;

        let source_id = input.display().to_string();
        let result = self
            .engine
            .anonymize_document(&document, &source_id)
            .map_err(|e| AnonymockError::Other(format!("{e:#}")))?;

        if result.dry_run {
            return Ok(result);
        }

        let target = output.unwrap_or(input);
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AnonymockError::Io(format!("{}: {e}", parent.display())))?;
        }

        let rendered = serde_json::to_string_pretty(&result.anonymized_data)?;
        tokio::fs::write(target, rendered)
            .await
            .map_err(|e| AnonymockError::Io(format!("{}: {e}", target.display())))?;

        tracing::debug!(
            input = %input.display(),
            output = %target.display(),
            detections = result.detections.len(),
            "Document written"
        );

        Ok(result)
    }

    /// Read and parse one JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`AnonymockError::SourceRead`] when the file cannot be read or
    /// is not valid JSON.
    pub async fn read_document(input: &Path) -> Result<Value> {
        let content = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| AnonymockError::source_read(input, e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| AnonymockError::source_read(input, e.to_string()))
    }

    /// Anonymize a list of files with one shared ledger
    ///
    /// Each output lands at `output_dir/<file name>`; without `output_dir`
    /// inputs are overwritten. Files that do not exist are skipped with a
    /// warning. Results are reported in input order.
    pub async fn process_scenario(&self, files: &[PathBuf], output_dir: Option<&Path>) -> ScenarioSummary {
        let start = Instant::now();
        let mut summary = ScenarioSummary::new(self.engine.run_id());

        let mut jobs = Vec::with_capacity(files.len());
        let mut seen_outputs = HashSet::new();
        for input in files {
            if !tokio::fs::metadata(input).await.map(|m| m.is_file()).unwrap_or(false) {
                tracing::warn!(input = %input.display(), "File not found, skipping");
                summary.missing_files.push(input.clone());
                continue;
            }

            let output = match (output_dir, input.file_name()) {
                (Some(dir), Some(name)) => dir.join(name),
                _ => input.clone(),
            };
            if !seen_outputs.insert(output.clone()) {
                tracing::warn!(
                    input = %input.display(),
                    output = %output.display(),
                    "Output path already used by another file in this scenario, it will be overwritten"
                );
            }
            jobs.push((input.clone(), output));
        }

        tracing::info!(
            run_id = %self.engine.run_id(),
            files = jobs.len(),
            missing = summary.missing_files.len(),
            concurrency = self.concurrency,
            "Processing scenario"
        );

        summary.processed_files = stream::iter(jobs)
            .map(|(input, output)| self.run_job(input, output))
            .buffered(self.concurrency)
            .collect()
            .await;

        summary.interrupted = self.is_shutdown_requested();
        summary.replacement_count = self.engine.replacer().ledger().len();
        summary.with_duration(start.elapsed())
    }

    async fn run_job(&self, input: PathBuf, output: PathBuf) -> ProcessedFile {
        if self.is_shutdown_requested() {
            return ProcessedFile::skipped(input, output);
        }

        match self.process_file(&input, Some(&output)).await {
            Ok(result) => ProcessedFile::success(input, output, result.detections.len()),
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to process file");
                ProcessedFile::error(input, output, e.to_string())
            }
        }
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Clear the shared ledger
    pub fn reset(&self) {
        self.engine.reset();
    }

    /// Every substitution made so far
    pub fn ledger_snapshot(&self) -> LedgerSnapshot {
        self.engine.ledger_snapshot()
    }

    /// Persist the shared ledger as pretty JSON
    pub fn save_ledger(&self, path: &Path) -> Result<()> {
        self.engine.replacer().ledger().save(path)
    }

    /// Merge a persisted ledger; returns the number of entries added
    pub fn load_ledger(&self, path: &Path) -> Result<usize> {
        let snapshot = Ledger::load(path)?;
        Ok(self.engine.preload(snapshot))
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
