//! Configuration loader with environment variable substitution and overrides
//!
//! The file format follows the extension: `.yaml`/`.yml`, `.json` or `.toml`.

use super::schema::AnonymockConfig;
use crate::domain::errors::AnonymockError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (`.yaml`, `.yml`)
    Yaml,
    /// JSON (`.json`)
    Json,
    /// TOML (`.toml`)
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(AnonymockError::Configuration(format!(
                "Unsupported configuration format: {} (expected .yaml, .yml, .json or .toml)",
                path.display()
            ))),
        }
    }
}

/// Loads configuration from a file
///
/// This function:
/// 1. Reads the file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses it according to its extension
/// 4. Applies environment variable overrides (ANONYMOCK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file is missing, unreadable or
/// invalid, or references an unset environment variable.
///
/// # Examples
///
/// ```no_run
/// use anonymock::config::loader::load_config;
///
/// let config = load_config("anonymock.yaml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnonymockConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnonymockError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let format = ConfigFormat::from_path(path)?;

    let contents = fs::read_to_string(path).map_err(|e| {
        AnonymockError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: AnonymockConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&contents)?,
        ConfigFormat::Json => serde_json::from_str(&contents)
            .map_err(|e| AnonymockError::Configuration(format!("JSON parse error: {e}")))?,
        ConfigFormat::Toml => toml::from_str(&contents)?,
    };

    finish(&mut config)?;

    tracing::debug!(
        path = %path.display(),
        rules = config.personal_info_patterns.len(),
        "Configuration loaded"
    );

    Ok(config)
}

/// Loads the configuration file when one is given, built-in defaults otherwise
///
/// Environment overrides and validation apply in both cases.
pub fn load_or_default(path: Option<&Path>) -> Result<AnonymockConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = AnonymockConfig::default();
            finish(&mut config)?;
            Ok(config)
        }
    }
}

fn finish(config: &mut AnonymockConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        AnonymockError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AnonymockError::Configuration(e.to_string()))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                if !missing_vars.iter().any(|v| v == var_name) {
                    missing_vars.push(var_name.to_string());
                }
                String::new()
            })
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AnonymockError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the ANONYMOCK_* prefix
///
/// Environment variables follow the pattern `ANONYMOCK_<SECTION>_<KEY>`,
/// e.g. `ANONYMOCK_PROCESSING_CONCURRENCY`.
fn apply_env_overrides(config: &mut AnonymockConfig) -> Result<()> {
    if let Ok(val) = std::env::var("ANONYMOCK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("ANONYMOCK_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_env("ANONYMOCK_APPLICATION_DRY_RUN", &val)?;
    }

    if let Ok(val) = std::env::var("ANONYMOCK_PATTERN_LIBRARY") {
        config.pattern_library = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("ANONYMOCK_PROCESSING_CONCURRENCY") {
        config.processing.concurrency = parse_env("ANONYMOCK_PROCESSING_CONCURRENCY", &val)?;
    }

    if let Ok(val) = std::env::var("ANONYMOCK_LEDGER_PATH") {
        config.ledger.path = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("ANONYMOCK_LEDGER_RESET") {
        config.ledger.reset = parse_env("ANONYMOCK_LEDGER_RESET", &val)?;
    }

    config
        .audit
        .apply_env_overrides()
        .map_err(|e| AnonymockError::Configuration(format!("{e:#}")))?;

    if let Ok(val) = std::env::var("ANONYMOCK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("ANONYMOCK_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("ANONYMOCK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ANONYMOCK_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| AnonymockError::Configuration(format!("Invalid {name} value: {value}")))
}
