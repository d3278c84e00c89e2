//! Configuration schema types
//!
//! Maps the YAML / JSON / TOML configuration file onto typed sections. Every
//! section has defaults, so an empty file (or no file at all) is a valid
//! configuration that uses the built-in pattern rules.

use crate::anonymization::config::{AnonymizationConfig, AuditConfig};
use crate::anonymization::detector::PatternDefinition;
use crate::scenario::DEFAULT_CONCURRENCY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Anonymock configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymockConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Pattern rules, in evaluation order (empty means built-in rules)
    #[serde(default)]
    pub personal_info_patterns: Vec<PatternDefinition>,

    /// TOML pattern library replacing `personal_info_patterns`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_library: Option<PathBuf>,

    /// Batch processing settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Ledger persistence
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Audit log
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AnonymockConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;

        for (index, rule) in self.personal_info_patterns.iter().enumerate() {
            if rule.pii_type.trim().is_empty() {
                return Err(format!("personal_info_patterns[{index}].type must not be empty"));
            }
        }

        self.processing.validate()?;
        self.audit.validate().map_err(|e| format!("{e:#}"))?;
        self.logging.validate()?;
        Ok(())
    }

    /// Settings for the anonymization engine
    pub fn anonymization(&self) -> AnonymizationConfig {
        AnonymizationConfig {
            patterns: self.personal_info_patterns.clone(),
            pattern_library: self.pattern_library.clone(),
            dry_run: self.application.dry_run,
            audit: self.audit.clone(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (detect only, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Batch processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Files processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl ProcessingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 || self.concurrency > 64 {
            return Err(format!(
                "processing.concurrency must be between 1 and 64, got {}",
                self.concurrency
            ));
        }
        Ok(())
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

/// Ledger persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// File the ledger is loaded from before a run and saved to after it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Ignore the persisted ledger and start empty
    #[serde(default)]
    pub reset: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must not be empty".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
