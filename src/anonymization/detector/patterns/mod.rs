//! Pattern library for personal-data identification
//!
//! A [`PatternSet`] is the compiled, ordered rule table the identifier walks.
//! Each rule pairs a set of key patterns with an optional value pattern and a
//! type tag:
//!
//! - key patterns match **case-insensitively anywhere** in the candidate key
//!   (`phone` matches `mobilePhoneNumber`); anchor them (`^phone$`) for exact keys
//! - the value pattern is **case-insensitive and anchored at the start only**;
//!   a rule that must match the whole value has to end its pattern with `$`
//!
//! Rule order is configuration order and the first matching rule wins.

use crate::anonymization::models::PiiCategory;
use crate::domain::{AnonymockError, Result};
use regex::{RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pattern definition as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDefinition {
    /// Key patterns (regular expressions)
    #[serde(default)]
    pub keys: Vec<String>,
    /// Personal-data type tag
    #[serde(rename = "type")]
    pub pii_type: String,
    /// Optional value pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl PatternDefinition {
    /// Create a definition
    pub fn new(keys: &[&str], pii_type: &str, pattern: Option<&str>) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            pii_type: pii_type.to_string(),
            pattern: pattern.map(str::to_string),
        }
    }
}

/// Pattern library container (`personal_info_patterns = [...]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternLibrary {
    /// Ordered rule definitions
    #[serde(default)]
    pub personal_info_patterns: Vec<PatternDefinition>,
}

/// Compiled rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    key_patterns: RegexSet,
    value_pattern: Option<fancy_regex::Regex>,
    category: PiiCategory,
}

impl PatternRule {
    fn compile(index: usize, def: &PatternDefinition) -> Result<Self> {
        if def.pii_type.trim().is_empty() {
            return Err(AnonymockError::pattern(index, "", "type must not be empty"));
        }

        let key_patterns = RegexSetBuilder::new(&def.keys)
            .case_insensitive(true)
            .build()
            .map_err(|e| AnonymockError::pattern(index, &def.pii_type, e.to_string()))?;

        let value_pattern = match def.pattern.as_deref() {
            Some(p) if !p.is_empty() => Some(
                fancy_regex::Regex::new(&format!("(?i)^(?:{p})"))
                    .map_err(|e| AnonymockError::pattern(index, &def.pii_type, e.to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            key_patterns,
            value_pattern,
            category: PiiCategory::from_tag(&def.pii_type),
        })
    }

    /// Whether any key pattern occurs in `key`
    pub fn matches_key(&self, key: &str) -> bool {
        self.key_patterns.is_match(key)
    }

    /// Whether `value` satisfies the value pattern (always true without one).
    /// A pattern that fails to evaluate counts as no match.
    pub fn matches_value(&self, value: &str) -> bool {
        match &self.value_pattern {
            None => true,
            Some(re) => re.is_match(value).unwrap_or(false),
        }
    }

    /// Type produced by this rule
    pub fn category(&self) -> &PiiCategory {
        &self.category
    }

    /// Whether the rule can ever match (no key patterns means unreachable)
    pub fn is_reachable(&self) -> bool {
        !self.key_patterns.is_empty()
    }
}

/// Ordered, compiled rule table
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
}

impl PatternSet {
    /// Compile rule definitions, preserving their order
    pub fn compile(definitions: &[PatternDefinition]) -> Result<Self> {
        let rules = definitions
            .iter()
            .enumerate()
            .map(|(index, def)| PatternRule::compile(index, def))
            .collect::<Result<Vec<_>>>()?;

        let unreachable = rules.iter().filter(|r| !r.is_reachable()).count();
        if unreachable > 0 {
            tracing::warn!(unreachable, "Pattern rules without key patterns will never match");
        }
        tracing::debug!(rules = rules.len(), "Compiled pattern set");

        Ok(Self { rules })
    }

    /// Create a pattern set from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content)?;
        Self::compile(&library.personal_info_patterns)
    }

    /// Create a pattern set from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnonymockError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Built-in rule table
    pub fn default_patterns() -> Result<Self> {
        Self::compile(&default_definitions()?)
    }

    /// Rules in configuration order
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Embedded default rule definitions
pub fn default_definitions() -> Result<Vec<PatternDefinition>> {
    let default_toml = include_str!("../../../../patterns/personal_info_patterns.toml");
    let library: PatternLibrary = toml::from_str(default_toml)?;
    Ok(library.personal_info_patterns)
}
