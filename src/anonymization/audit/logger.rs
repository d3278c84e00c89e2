//! Audit logger for anonymization operations

use crate::anonymization::models::{AnonymizedDocument, Identification};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    run_id: String,
    source_id: String,
    detections_count: usize,
    dry_run: bool,
    processing_time_ms: u64,
    detections: Vec<AuditDetection>,
}

/// Audit detection entry (with hashed value)
#[derive(Debug, Serialize)]
struct AuditDetection {
    #[serde(rename = "type")]
    pii_type: String,
    path: String,
    /// SHA-256 of the original value; plaintext is never written
    value_hash: String,
}

/// Append-only audit trail of anonymized documents
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    run_id: String,
    // Serializes appends from concurrently processed documents
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger, creating the log directory
    pub fn new(log_path: PathBuf, json_format: bool, run_id: impl Into<String>) -> Result<Self> {
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create audit log directory: {}", parent.display())
            })?;
        }

        Ok(Self {
            log_path,
            json_format,
            run_id: run_id.into(),
            write_lock: Mutex::new(()),
        })
    }

    /// Identifier stamped on every entry of this run
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Log an anonymized document
    pub fn log_anonymization(&self, document: &AnonymizedDocument) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: document.timestamp.to_rfc3339(),
            run_id: self.run_id.clone(),
            source_id: document.source_id.clone(),
            detections_count: document.detections.len(),
            dry_run: document.dry_run,
            processing_time_ms: document.processing_time_ms,
            detections: document
                .detections
                .iter()
                .map(create_audit_detection)
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let line = if self.json_format {
            serde_json::to_string(entry).context("Failed to serialize audit entry")?
        } else {
            format!(
                "[{}] Run: {} | Source: {} | Detections: {} | Dry run: {} | Time: {}ms",
                entry.timestamp,
                entry.run_id,
                entry.source_id,
                entry.detections_count,
                entry.dry_run,
                entry.processing_time_ms
            )
        };

        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;
        writeln!(file, "{line}").context("Failed to write audit entry")?;

        Ok(())
    }
}

fn create_audit_detection(identification: &Identification) -> AuditDetection {
    AuditDetection {
        pii_type: identification.category.to_string(),
        path: identification.location().to_string(),
        value_hash: hash_value(&identification.value),
    }
}

/// Hex SHA-256 of `value`
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}
