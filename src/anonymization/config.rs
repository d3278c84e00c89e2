//! Anonymization configuration

use crate::anonymization::detector::{PatternDefinition, PatternSet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings the [`AnonymizationEngine`](super::AnonymizationEngine) is built from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Inline rule definitions, in evaluation order
    #[serde(default)]
    pub patterns: Vec<PatternDefinition>,

    /// Path to a TOML pattern library; takes precedence over inline rules
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Dry-run mode (detect but don't rewrite)
    #[serde(default)]
    pub dry_run: bool,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        self.audit.validate().context("Invalid audit configuration")?;

        Ok(())
    }

    /// Compile the active rule table.
    ///
    /// A pattern library file wins over inline rules; with neither, the
    /// built-in rules are used.
    pub fn compile_patterns(&self) -> Result<PatternSet> {
        if let Some(ref path) = self.pattern_library {
            return PatternSet::from_file(path)
                .with_context(|| format!("Failed to load pattern library {}", path.display()));
        }

        if self.patterns.is_empty() {
            tracing::debug!("No rules configured, using built-in patterns");
            return PatternSet::default_patterns().context("Built-in patterns are invalid");
        }

        PatternSet::compile(&self.patterns).context("Invalid personal_info_patterns")
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON lines for audit entries
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path must not be empty when auditing is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("ANONYMOCK_AUDIT_ENABLED") {
            self.enabled = val.parse().context("Invalid ANONYMOCK_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("ANONYMOCK_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("ANONYMOCK_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid ANONYMOCK_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}
