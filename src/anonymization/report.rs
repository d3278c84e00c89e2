//! Detection reporting for dry runs
//!
//! Aggregates what a scan found across documents: counts by type, a few
//! sample locations with masked originals and the replacement each would get,
//! and warnings for documents that could not be read.

use crate::anonymization::models::{AnonymizedDocument, Identification};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_SAMPLES: usize = 20;
const SAMPLES_PER_DOCUMENT: usize = 3;

/// Dry-run report with detection statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Total documents scanned
    pub total_documents: usize,

    /// Total personal-data fields detected
    pub total_detections: usize,

    /// Detections by type tag
    pub detections_by_type: BTreeMap<String, usize>,

    /// Sample detections
    pub samples: Vec<DetectionSample>,

    /// Documents that could not be scanned
    pub warnings: Vec<String>,

    /// Processing statistics
    pub stats: ProcessingStats,
}

/// One sample detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSample {
    /// Document the field was found in
    pub source_id: String,

    /// Structural path of the field
    pub path: String,

    /// Type tag
    #[serde(rename = "type")]
    pub pii_type: String,

    /// Original value with all but the first character masked
    pub masked_original: String,

    /// Replacement the value would receive
    pub replacement: String,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Average processing time per document (ms)
    pub avg_processing_time_ms: u64,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,

    /// Documents with at least one detection
    pub documents_with_pii: usize,

    /// Documents without detections
    pub documents_without_pii: usize,
}

impl DetectionReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the scan result of one document.
    ///
    /// `preview` yields the replacement a detection would receive.
    pub fn add_document<F>(&mut self, document: &AnonymizedDocument, preview: F)
    where
        F: Fn(&Identification) -> String,
    {
        self.total_documents += 1;
        self.stats.total_processing_time_ms += document.processing_time_ms;

        if document.detections.is_empty() {
            self.stats.documents_without_pii += 1;
        } else {
            self.stats.documents_with_pii += 1;
            self.total_detections += document.detections.len();

            for detection in &document.detections {
                *self
                    .detections_by_type
                    .entry(detection.category.to_string())
                    .or_insert(0) += 1;
            }

            for detection in document.detections.iter().take(SAMPLES_PER_DOCUMENT) {
                if self.samples.len() >= MAX_SAMPLES {
                    break;
                }
                self.samples.push(DetectionSample {
                    source_id: document.source_id.clone(),
                    path: detection.location().to_string(),
                    pii_type: detection.category.to_string(),
                    masked_original: mask(&detection.value),
                    replacement: preview(detection),
                });
            }
        }

        self.stats.avg_processing_time_ms =
            self.stats.total_processing_time_ms / self.total_documents as u64;
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                 PERSONAL DATA DETECTION REPORT                \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Documents Scanned:           {}\n",
            self.total_documents
        ));
        output.push_str(&format!(
            "  Documents with PII:          {}\n",
            self.stats.documents_with_pii
        ));
        output.push_str(&format!(
            "  Documents without PII:       {}\n",
            self.stats.documents_without_pii
        ));
        output.push_str(&format!(
            "  Total Fields Detected:       {}\n",
            self.total_detections
        ));
        output.push_str(&format!(
            "  Avg Processing Time:         {} ms\n",
            self.stats.avg_processing_time_ms
        ));
        output.push('\n');

        if !self.detections_by_type.is_empty() {
            output.push_str("🔍 DETECTIONS BY TYPE\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut types: Vec<_> = self.detections_by_type.iter().collect();
            types.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (pii_type, count) in types {
                output.push_str(&format!("  {pii_type:30} {count:>5}\n"));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("📝 SAMPLE DETECTIONS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            for (i, sample) in self.samples.iter().take(10).enumerate() {
                output.push_str(&format!("\n  Sample #{}\n", i + 1));
                output.push_str(&format!("    Source:      {}\n", sample.source_id));
                output.push_str(&format!("    Path:        {}\n", sample.path));
                output.push_str(&format!("    Type:        {}\n", sample.pii_type));
                output.push_str(&format!("    Original:    \"{}\"\n", sample.masked_original));
                output.push_str(&format!("    Replacement: \"{}\"\n", sample.replacement));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {warning}\n"));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Keep the first character and mask the rest, capped at 50 characters
fn mask(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.count().min(49);
            format!("{first}{}", "*".repeat(rest))
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::PiiCategory;
    use serde_json::json;

    fn detection(category: PiiCategory, value: &str, path: &str) -> Identification {
        Identification::new(category, value.to_string(), "k".to_string()).with_path(path)
    }

    #[test]
    fn test_report_creation() {
        let report = DetectionReport::new();
        assert_eq!(report.total_documents, 0);
        assert_eq!(report.total_detections, 0);
        assert!(report.detections_by_type.is_empty());
        assert!(report.samples.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_add_document_without_pii() {
        let mut report = DetectionReport::new();
        let doc = AnonymizedDocument::new("a.json".into(), json!({"id": 1}), vec![], true, 10);

        report.add_document(&doc, |_| unreachable!());

        assert_eq!(report.total_documents, 1);
        assert_eq!(report.stats.documents_without_pii, 1);
        assert_eq!(report.stats.avg_processing_time_ms, 10);
    }

    #[test]
    fn test_add_document_with_pii() {
        let mut report = DetectionReport::new();
        let doc = AnonymizedDocument::new(
            "b.json".into(),
            json!({}),
            vec![
                detection(PiiCategory::Name, "홍길동", "request.name"),
                detection(PiiCategory::Email, "kim@corp.co.kr", "request.email"),
                detection(PiiCategory::Name, "김철수", "response.name"),
                detection(PiiCategory::Phone, "010-1234-5678", "response.phone"),
            ],
            true,
            20,
        );

        report.add_document(&doc, |d| format!("<{}>", d.category));

        assert_eq!(report.total_detections, 4);
        assert_eq!(report.detections_by_type["name"], 2);
        assert_eq!(report.detections_by_type["phone"], 1);
        assert_eq!(report.samples.len(), 3);
        assert_eq!(report.samples[0].masked_original, "홍**");
        assert_eq!(report.samples[0].replacement, "<name>");
        assert_eq!(report.samples[1].path, "request.email");
    }

    #[test]
    fn test_samples_never_contain_plaintext() {
        let mut report = DetectionReport::new();
        let doc = AnonymizedDocument::new(
            "c.json".into(),
            json!({}),
            vec![detection(PiiCategory::Email, "secret@corp.co.kr", "email")],
            true,
            1,
        );
        report.add_document(&doc, |_| "x".into());

        let json = report.format_json().unwrap();
        assert!(!json.contains("secret@corp.co.kr"));
        assert!(!report.format_console().contains("secret@corp.co.kr"));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("a"), "a");
        assert_eq!(mask("abc"), "a**");
        assert_eq!(mask(&"x".repeat(100)).chars().count(), 50);
    }

    #[test]
    fn test_format_console() {
        let mut report = DetectionReport::new();
        report.total_documents = 10;
        report.total_detections = 5;
        report.add_warning("Failed to read broken.json".into());

        let output = report.format_console();
        assert!(output.contains("PERSONAL DATA DETECTION REPORT"));
        assert!(output.contains("Documents Scanned:           10"));
        assert!(output.contains("Total Fields Detected:       5"));
        assert!(output.contains("Failed to read broken.json"));
    }
}
