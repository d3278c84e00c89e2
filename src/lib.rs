// Anonymock - consistent anonymization of personal data in Wiremock mappings
// Copyright (c) 2025 Anonymock Contributors
// Licensed under the MIT License

//! # Anonymock - consistent anonymization for Wiremock mappings
//!
//! Anonymock finds personal data (names, resident registration numbers, phone
//! numbers, card numbers, ...) in Wiremock mapping files and other JSON
//! documents and replaces it with synthetic values. Replacements keep the
//! original's textual shape but fail the real-world validity rule for their
//! type, so they can never collide with a real record.
//!
//! ## Overview
//!
//! - **Identification** through ordered key/value pattern rules
//! - **Generation** of shape-valid, real-invalid values per type
//! - **Consistent replacement**: the same original always gets the same
//!   replacement, across documents, runs and machines, including inside URL
//!   query strings and percent-encoded values
//! - **Batch processing** of whole scenarios with one shared ledger
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Detection, generation, replacement, ledger, audit
//! - [`scenario`] - Batch coordinator over mapping files
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anonymock::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! use anonymock::scenario::ScenarioProcessor;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//!     let processor = ScenarioProcessor::new(engine);
//!
//!     let files = ScenarioProcessor::find_json_files(Path::new("mappings")).await?;
//!     let summary = processor
//!         .process_scenario(&files, Some(Path::new("anonymized")))
//!         .await;
//!
//!     println!("{} files, {} replacements", summary.success_count(), summary.replacement_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Consistency
//!
//! Every replacement is derived from an MD5 hash of `"{type}:{original}"`,
//! so two independent runs agree without sharing state. Within a run the
//! [`anonymization::Ledger`] additionally pins the first replacement handed
//! out for each pair, and can be persisted to JSON and loaded again:
//!
//! ```rust,no_run
//! use anonymock::anonymization::{AnonymizationConfig, AnonymizationEngine, Ledger};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! engine.preload(Ledger::load("ledger.json")?);
//!
//! let doc = json!({"name": "홍길동", "nm": "홍길동"});
//! let result = engine.anonymize_document(&doc, "inline")?;
//! assert_eq!(result.anonymized_data["name"], result.anonymized_data["nm"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library errors use [`domain::AnonymockError`]; a malformed document is
//! reported for that document only and never aborts a batch.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod scenario;
