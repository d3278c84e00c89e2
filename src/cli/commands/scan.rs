//! Scan command implementation
//!
//! Runs detection in dry-run mode and prints a [`DetectionReport`] showing
//! what an `anonymize` run would replace.

use crate::anonymization::{AnonymizationEngine, DetectionReport};
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_PARTIAL_FAILURE, EXIT_SUCCESS};
use crate::config::load_or_default;
use crate::scenario::ScenarioProcessor;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Mapping file or directory of mapping files
    pub input: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    /// Execute the scan command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting scan command");

        let mut config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        config.application.dry_run = true;

        let engine = match AnonymizationEngine::new(config.anonymization()) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Configuration error: {e:#}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        let processor = ScenarioProcessor::new(engine);

        let files = if self.input.is_dir() {
            ScenarioProcessor::find_json_files(&self.input).await?
        } else if self.input.is_file() {
            vec![self.input.clone()]
        } else {
            eprintln!("❌ Input not found: {}", self.input.display());
            return Ok(EXIT_PARTIAL_FAILURE);
        };

        let report = scan_files(&processor, &files).await;

        if self.json {
            println!("{}", report.format_json()?);
        } else {
            print!("{}", report.format_console());
        }

        Ok(EXIT_SUCCESS)
    }
}

/// Build a detection report over `files`; unreadable files become warnings.
///
/// Files are only read, whatever the processor's dry-run setting.
pub async fn scan_files(processor: &ScenarioProcessor, files: &[PathBuf]) -> DetectionReport {
    let mut report = DetectionReport::new();
    let engine = processor.engine();

    for file in files {
        match ScenarioProcessor::read_document(file).await {
            Ok(document) => {
                let scanned = engine.scan_document(&document, &file.display().to_string());
                report.add_document(&scanned, |d| engine.preview(d));
            }
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Skipping unreadable file");
                report.add_warning(e.to_string());
            }
        }
    }

    report
}
