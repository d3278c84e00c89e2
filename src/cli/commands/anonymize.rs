//! Anonymize command implementation
//!
//! This module implements the `anonymize` command: rewrites a single mapping
//! file or every JSON file under a directory, sharing one ledger across all
//! of them.

use crate::anonymization::AnonymizationEngine;
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_INTERRUPTED, EXIT_PARTIAL_FAILURE, EXIT_SUCCESS};
use crate::config::{load_or_default, AnonymockConfig};
use crate::scenario::{ProcessedFile, ScenarioProcessor, ScenarioSummary};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::watch;

/// Largest ledger printed in full after a run
const MAPPING_TABLE_LIMIT: usize = 10;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Mapping file or directory of mapping files
    pub input: PathBuf,

    /// Output directory (or output file for a single `.json` input); overwrite inputs when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Ledger file loaded before the run and saved after it
    #[arg(long, value_name = "FILE")]
    pub ledger: Option<PathBuf>,

    /// Start from an empty ledger even if the ledger file exists
    #[arg(long)]
    pub reset: bool,

    /// Detect only, write nothing
    #[arg(long)]
    pub dry_run: bool,
}

/// Where the results of a run go
#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputTarget {
    /// Overwrite every input
    InPlace,
    /// `dir/<file name>` for every input
    Directory(PathBuf),
    /// Explicit file for a single input
    File(PathBuf),
}

impl OutputTarget {
    fn resolve(input_is_dir: bool, output: Option<&Path>) -> Self {
        match output {
            None => Self::InPlace,
            Some(path) if !input_is_dir && has_json_extension(path) => Self::File(path.to_path_buf()),
            Some(path) => Self::Directory(path.to_path_buf()),
        }
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting anonymize command");

        let mut config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        self.apply_overrides(&mut config);

        let engine = match AnonymizationEngine::new(config.anonymization()) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Failed to build anonymization engine");
                eprintln!("Configuration error: {e:#}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let processor = ScenarioProcessor::new(engine)
            .with_concurrency(config.processing.concurrency)
            .with_shutdown_signal(shutdown_signal);

        let input_is_dir = self.input.is_dir();
        let files = if input_is_dir {
            match ScenarioProcessor::find_json_files(&self.input).await {
                Ok(files) => files,
                Err(e) => {
                    eprintln!("❌ Failed to read input directory: {e}");
                    return Ok(EXIT_PARTIAL_FAILURE);
                }
            }
        } else if self.input.is_file() {
            vec![self.input.clone()]
        } else {
            eprintln!("❌ Input not found: {}", self.input.display());
            return Ok(EXIT_PARTIAL_FAILURE);
        };

        println!("Found {} JSON file(s)", files.len());
        if files.is_empty() {
            eprintln!("❌ No JSON files found under {}", self.input.display());
            return Ok(EXIT_PARTIAL_FAILURE);
        }

        let ledger_path = config.ledger.path.clone();
        if let Some(ref path) = ledger_path {
            if config.ledger.reset {
                tracing::info!(path = %path.display(), "Ledger reset requested, starting empty");
                processor.reset();
            } else if path.exists() {
                match processor.load_ledger(path) {
                    Ok(added) => println!("Loaded {added} ledger entries from {}", path.display()),
                    Err(e) => {
                        eprintln!("Configuration error: invalid ledger file: {e}");
                        return Ok(EXIT_CONFIG_ERROR);
                    }
                }
            }
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - no files will be written");
        }
        println!();

        let summary = match OutputTarget::resolve(input_is_dir, self.output.as_deref()) {
            OutputTarget::InPlace => processor.process_scenario(&files, None).await,
            OutputTarget::Directory(dir) => processor.process_scenario(&files, Some(&dir)).await,
            OutputTarget::File(output) => process_single(&processor, &self.input, &output).await,
        };
        summary.log_summary();

        if let Some(ref path) = ledger_path {
            if !config.application.dry_run {
                if let Err(e) = processor.save_ledger(path) {
                    tracing::error!(error = %e, "Failed to save ledger");
                    eprintln!("❌ Failed to save ledger: {e}");
                    return Ok(EXIT_FATAL);
                }
                println!("Ledger saved to {}", path.display());
            }
        }

        print_summary(&processor, &summary);

        let exit_code = if summary.interrupted {
            println!("⚠️  Run interrupted, remaining files were left untouched.");
            EXIT_INTERRUPTED
        } else if summary.error_count() > 0 {
            EXIT_PARTIAL_FAILURE
        } else {
            EXIT_SUCCESS
        };

        Ok(exit_code)
    }

    fn apply_overrides(&self, config: &mut AnonymockConfig) {
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if let Some(ref ledger) = self.ledger {
            config.ledger.path = Some(ledger.clone());
        }
        if self.reset {
            config.ledger.reset = true;
        }
    }
}

async fn process_single(processor: &ScenarioProcessor, input: &Path, output: &Path) -> ScenarioSummary {
    let start = Instant::now();
    let mut summary = ScenarioSummary::new(processor.engine().run_id());

    let processed = match processor.process_file(input, Some(output)).await {
        Ok(result) => {
            ProcessedFile::success(input.to_path_buf(), output.to_path_buf(), result.detections.len())
        }
        Err(e) => {
            crate::log_error_with_context!(&e, "Failed to process file");
            ProcessedFile::error(input.to_path_buf(), output.to_path_buf(), e.to_string())
        }
    };
    summary.processed_files.push(processed);
    summary.replacement_count = processor.ledger_snapshot().len();
    summary.with_duration(start.elapsed())
}

fn print_summary(processor: &ScenarioProcessor, summary: &ScenarioSummary) {
    println!();
    println!("📊 Anonymization Summary:");
    println!("  Succeeded: {}", summary.success_count());
    println!("  Failed: {}", summary.error_count());
    if !summary.missing_files.is_empty() {
        println!("  Missing: {}", summary.missing_files.len());
    }
    if summary.skipped_count() > 0 {
        println!("  Skipped: {}", summary.skipped_count());
    }
    println!("  Fields detected: {}", summary.total_detections());
    println!("  Replacements: {}", summary.replacement_count);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    let failed: Vec<_> = summary.failed_files().collect();
    if !failed.is_empty() {
        println!();
        println!("⚠️  Failed files:");
        for file in failed {
            println!(
                "  - {}: {}",
                file.input.display(),
                file.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let snapshot = processor.ledger_snapshot();
    if !snapshot.is_empty() && snapshot.len() <= MAPPING_TABLE_LIMIT {
        println!();
        println!("Replacements:");
        for entry in snapshot.values() {
            println!("  {} -> {} ({})", entry.original, entry.replacement, entry.category);
        }
    }
    println!();
}
