//! Anonymization module for Anonymock
//!
//! Detects personal data in JSON documents and replaces it with synthetic
//! values that keep the original's shape but can never be real records.
//! The same original always maps to the same replacement, across documents,
//! runs and machines.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Detection**: ordered key/value pattern rules ([`detector`])
//! - **Generation**: shape-valid, real-invalid values ([`generator`])
//! - **Replacement**: hash-seeded substitution through a write-once ledger
//!   ([`replacer`], [`ledger`])
//! - **Audit**: per-document entries with hashed values ([`audit`])
//!
//! # Usage
//!
//! ```rust,ignore
//! use anonymock::anonymization::{AnonymizationConfig, AnonymizationEngine};
//!
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! let result = engine.anonymize_document(&mapping, "mapping.json")?;
//! ```

pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod generator;
pub mod ledger;
pub mod models;
pub mod replacer;
pub mod report;

// Re-export main types
pub use config::AnonymizationConfig;
pub use engine::AnonymizationEngine;
pub use ledger::{Ledger, LedgerEntry, LedgerSnapshot};
pub use models::{AnonymizedDocument, Identification, PiiCategory};
pub use replacer::Replacer;
pub use report::DetectionReport;
