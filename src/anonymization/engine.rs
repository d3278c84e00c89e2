//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that wires identification,
//! substitution and audit logging together for one processing run.
//!
//! # Architecture
//!
//! The engine coordinates three components:
//! - **Detector**: decides which fields hold personal data
//! - **Replacer**: rewrites documents through the shared ledger
//! - **Audit Logger**: records one entry per document with hashed values
//!
//! # Examples
//!
//! ```no_run
//! use anonymock::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! use serde_json::json;
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//!
//! let mapping = json!({
//!     "request": {"url": "/api/users?name=%ED%99%8D%EA%B8%B8%EB%8F%99"},
//!     "response": {"jsonBody": {"name": "홍길동", "phone": "010-1234-5678"}}
//! });
//!
//! let result = engine.anonymize_document(&mapping, "user-lookup.json")?;
//! println!("Replaced {} fields", result.detections.len());
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    audit::AuditLogger,
    config::AnonymizationConfig,
    detector::{PatternIdentifier, PiiDetector},
    ledger::LedgerSnapshot,
    models::{AnonymizedDocument, Identification},
    replacer::Replacer,
};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Main anonymization engine
///
/// # Thread Safety
///
/// The engine can be shared across tasks with `Arc`; the ledger inside the
/// replacer is mutex-guarded, so documents processed concurrently still see
/// one consistent mapping.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    replacer: Replacer,
    audit_logger: Option<AuditLogger>,
    run_id: String,
    pattern_count: usize,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - A pattern rule does not compile
    /// - Audit logger initialization fails
    pub fn new(config: AnonymizationConfig) -> Result<Self> {
        config
            .validate()
            .context("Invalid anonymization configuration")?;

        let patterns = config.compile_patterns()?;
        let pattern_count = patterns.len();
        let detector: Arc<dyn PiiDetector> = Arc::new(PatternIdentifier::new(patterns));

        let mut engine = Self::with_detector(config, detector)?;
        engine.pattern_count = pattern_count;
        Ok(engine)
    }

    /// Create an engine around a custom detector
    pub fn with_detector(config: AnonymizationConfig, detector: Arc<dyn PiiDetector>) -> Result<Self> {
        let run_id = Uuid::new_v4().to_string();

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                run_id.clone(),
            )?)
        } else {
            None
        };

        tracing::debug!(
            run_id = %run_id,
            dry_run = config.dry_run,
            audit = config.audit.enabled,
            "Anonymization engine ready"
        );

        Ok(Self {
            replacer: Replacer::new(detector),
            config,
            audit_logger,
            run_id,
            pattern_count: 0,
        })
    }

    /// Anonymize a single document
    ///
    /// # Behavior
    ///
    /// 1. In dry-run mode returns the original document with what would be
    ///    replaced
    /// 2. Otherwise rewrites it through the replacer, reporting every
    ///    substitution including URL query parameters and percent-encoded
    ///    values
    /// 3. Writes an audit entry when auditing is enabled
    ///
    /// # Errors
    ///
    /// Returns an error only if the audit entry cannot be written.
    pub fn anonymize_document(&self, document: &Value, source_id: &str) -> Result<AnonymizedDocument> {
        let start = Instant::now();

        let (anonymized_data, detections) = if self.config.dry_run {
            (document.clone(), self.replacer.detect_tree(document))
        } else {
            self.replacer.rewrite_tree_with_detections(document)
        };

        let result = AnonymizedDocument::new(
            source_id.to_string(),
            anonymized_data,
            detections,
            self.config.dry_run,
            start.elapsed().as_millis() as u64,
        );

        if let Some(ref logger) = self.audit_logger {
            logger
                .log_anonymization(&result)
                .with_context(|| format!("Failed to audit {source_id}"))?;
        }

        Ok(result)
    }

    /// Report what [`anonymize_document`](Self::anonymize_document) would
    /// replace, whatever the dry-run setting.
    ///
    /// Never touches the ledger or the audit log.
    pub fn scan_document(&self, document: &Value, source_id: &str) -> AnonymizedDocument {
        let start = Instant::now();
        let detections = self.replacer.detect_tree(document);

        AnonymizedDocument::new(
            source_id.to_string(),
            document.clone(),
            detections,
            true,
            start.elapsed().as_millis() as u64,
        )
    }

    /// Replacement a detection would receive, without recording it
    pub fn preview(&self, identification: &Identification) -> String {
        self.replacer
            .preview(&identification.category, &identification.value)
    }

    /// Shared replacer
    pub fn replacer(&self) -> &Replacer {
        &self.replacer
    }

    /// Every substitution made so far
    pub fn ledger_snapshot(&self) -> LedgerSnapshot {
        self.replacer.ledger_snapshot()
    }

    /// Merge a persisted ledger
    pub fn preload(&self, snapshot: LedgerSnapshot) -> usize {
        self.replacer.preload(snapshot)
    }

    /// Clear the ledger
    pub fn reset(&self) {
        self.replacer.reset();
    }

    /// Check if in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Identifier of this run (stamped on audit entries)
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Number of compiled pattern rules (0 for custom detectors)
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }
}
