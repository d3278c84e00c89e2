//! Personal-data entity models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Personal-data type tag
///
/// One variant per type the generator knows how to fabricate, plus
/// [`PiiCategory::Other`] for any tag a configuration introduces on its own.
/// Serializes as the plain tag string (`"name"`, `"card_number"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PiiCategory {
    /// Personal names
    Name,
    /// Company / legal entity names
    CompanyName,
    /// National identification (resident registration) numbers
    Ssn,
    /// Passport numbers
    Passport,
    /// Driver's license numbers
    DriverLicense,
    /// Dates of birth
    BirthDate,
    /// Telephone numbers
    Phone,
    /// Postal addresses
    Address,
    /// Payment card numbers
    CardNumber,
    /// Bank account numbers
    AccountNumber,
    /// Email addresses
    Email,
    /// Mobile equipment identifiers
    Imei,
    /// Mobile subscriber identities
    Imsi,
    /// Hardware (MAC) addresses
    MacAddress,
    /// Any tag without a dedicated generator
    Other(String),
}

impl PiiCategory {
    /// Parse a configuration tag. Unknown tags become [`PiiCategory::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "name" => Self::Name,
            "company_name" => Self::CompanyName,
            "ssn" => Self::Ssn,
            "passport" => Self::Passport,
            "driver_license" => Self::DriverLicense,
            "birth_date" => Self::BirthDate,
            "phone" => Self::Phone,
            "address" => Self::Address,
            "card_number" => Self::CardNumber,
            "account_number" => Self::AccountNumber,
            "email" => Self::Email,
            "imei" => Self::Imei,
            "imsi" => Self::Imsi,
            "mac_address" => Self::MacAddress,
            other => Self::Other(other.to_string()),
        }
    }

    /// The configuration tag for this category
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name => "name",
            Self::CompanyName => "company_name",
            Self::Ssn => "ssn",
            Self::Passport => "passport",
            Self::DriverLicense => "driver_license",
            Self::BirthDate => "birth_date",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::CardNumber => "card_number",
            Self::AccountNumber => "account_number",
            Self::Email => "email",
            Self::Imei => "imei",
            Self::Imsi => "imsi",
            Self::MacAddress => "mac_address",
            Self::Other(tag) => tag,
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &str {
        match self {
            Self::Name => "Person name",
            Self::CompanyName => "Company name",
            Self::Ssn => "National ID",
            Self::Passport => "Passport",
            Self::DriverLicense => "Driver's license",
            Self::BirthDate => "Birth date",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::CardNumber => "Card number",
            Self::AccountNumber => "Bank account",
            Self::Email => "Email",
            Self::Imei => "IMEI",
            Self::Imsi => "IMSI",
            Self::MacAddress => "MAC address",
            Self::Other(tag) => tag,
        }
    }

    /// Whether replacements for this category come from an index sequence
    /// rather than the seeded random stream
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Name | Self::CompanyName)
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PiiCategory {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<PiiCategory> for String {
    fn from(category: PiiCategory) -> Self {
        category.as_str().to_string()
    }
}

/// A field identified as personal data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    /// Type of the personal data
    #[serde(rename = "type")]
    pub category: PiiCategory,
    /// String form of the matched value
    pub value: String,
    /// Key used for the lookup
    pub key: String,
    /// Structural path (`a.b[2].c`), set by tree scans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Identification {
    /// Create a new identification without a structural path
    pub fn new(category: PiiCategory, value: String, key: String) -> Self {
        Self {
            category,
            value,
            key,
            path: None,
        }
    }

    /// Attach a structural path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Path if known, otherwise the lookup key
    pub fn location(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.key)
    }
}

/// Anonymized document result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizedDocument {
    /// Identifier of the source (file path or caller-provided id)
    pub source_id: String,
    /// Rewritten document (original document in dry-run mode)
    pub anonymized_data: Value,
    /// Fields detected as personal data
    pub detections: Vec<Identification>,
    /// Whether the document was only scanned
    pub dry_run: bool,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of anonymization
    pub timestamp: DateTime<Utc>,
    /// Statistics by type
    pub stats_by_category: HashMap<PiiCategory, usize>,
}

impl AnonymizedDocument {
    /// Create a new anonymized document
    pub fn new(
        source_id: String,
        anonymized_data: Value,
        detections: Vec<Identification>,
        dry_run: bool,
        processing_time_ms: u64,
    ) -> Self {
        let mut stats_by_category = HashMap::new();
        for detection in &detections {
            *stats_by_category
                .entry(detection.category.clone())
                .or_insert(0) += 1;
        }

        Self {
            source_id,
            anonymized_data,
            detections,
            dry_run,
            processing_time_ms,
            timestamp: Utc::now(),
            stats_by_category,
        }
    }

    /// Get total number of detections
    pub fn total_detections(&self) -> usize {
        self.detections.len()
    }

    /// Check if any personal data was detected
    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }
}
