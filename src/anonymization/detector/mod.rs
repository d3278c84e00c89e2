//! Personal-data identification
//!
//! Provides the trait-based identification interface and the pattern-driven
//! implementation used by the replacer.

pub mod identifier;
pub mod patterns;

use crate::anonymization::models::Identification;
use serde_json::Value;

pub use identifier::PatternIdentifier;
pub use patterns::{PatternDefinition, PatternRule, PatternSet};

/// Trait for personal-data identification implementations
pub trait PiiDetector: Send + Sync {
    /// Decide whether the scalar `value` stored under `key` is personal data.
    ///
    /// Non-string scalars are judged by their string form; `null`, maps and
    /// sequences are never personal data on their own.
    fn identify(&self, value: &Value, key: &str) -> Option<Identification>;

    /// Same as [`identify`](Self::identify) for an already-textual value
    fn identify_str(&self, value: &str, key: &str) -> Option<Identification>;

    /// Walk a whole document and report every personal-data field with its path
    fn identify_tree(&self, document: &Value) -> Vec<Identification>;
}
