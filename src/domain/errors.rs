//! Domain error types
//!
//! This module defines the error hierarchy for Anonymock.
//! All errors are domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main Anonymock error type
///
/// This is the primary error type used throughout the library. Only
/// configuration-time errors cross the anonymization core's boundary; every
/// per-value anomaly met while rewriting is absorbed by the replacer.
#[derive(Debug, Error)]
pub enum AnonymockError {
    /// Configuration-related errors (unreadable file, bad log level, missing env var)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A pattern rule could not be compiled
    #[error("Pattern error in rule #{index} ({pii_type}): {message}")]
    Pattern {
        /// Position of the rule in configuration order
        index: usize,
        /// Type tag of the offending rule
        pii_type: String,
        /// What went wrong
        message: String,
    },

    /// A source document could not be read or parsed
    #[error("Failed to read source document {path}: {message}")]
    SourceRead {
        /// Path of the document
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Error carrying added context
    #[error("{0}")]
    Other(String),
}

impl AnonymockError {
    /// Creates a pattern error for the rule at `index`
    pub fn pattern(index: usize, pii_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            index,
            pii_type: pii_type.into(),
            message: message.into(),
        }
    }

    /// Creates a source read error for `path`
    pub fn source_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SourceRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error only affects a single document of a batch
    pub fn is_per_document(&self) -> bool {
        matches!(self, Self::SourceRead { .. } | Self::Io(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for AnonymockError {
    fn from(err: std::io::Error) -> Self {
        AnonymockError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AnonymockError {
    fn from(err: serde_json::Error) -> Self {
        AnonymockError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AnonymockError {
    fn from(err: toml::de::Error) -> Self {
        AnonymockError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from YAML parse errors
impl From<serde_yaml::Error> for AnonymockError {
    fn from(err: serde_yaml::Error) -> Self {
        AnonymockError::Configuration(format!("YAML parse error: {err}"))
    }
}
