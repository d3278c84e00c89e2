//! Validate config command implementation
//!
//! Loads the configuration, compiles every pattern rule and prints a summary.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::load_or_default;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let source = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string());
        tracing::info!(config = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        let config = match load_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let patterns = match config.anonymization().compile_patterns() {
            Ok(patterns) => patterns,
            Err(e) => {
                println!("❌ Pattern rules are invalid");
                println!("   Error: {e:#}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        match config.pattern_library {
            Some(ref library) => println!("  Pattern Library: {}", library.display()),
            None if config.personal_info_patterns.is_empty() => {
                println!("  Pattern Rules: built-in")
            }
            None => println!("  Pattern Rules: inline"),
        }
        println!("  Rule Count: {}", patterns.len());
        for (index, rule) in patterns.rules().iter().enumerate() {
            let note = if rule.is_reachable() { "" } else { " (never matches)" };
            println!("    {:>2}. {}{note}", index + 1, rule.category());
        }
        println!("  Concurrency: {}", config.processing.concurrency);
        match config.ledger.path {
            Some(ref path) => println!("  Ledger: {}", path.display()),
            None => println!("  Ledger: not persisted"),
        }
        println!(
            "  Audit Log: {}",
            if config.audit.enabled {
                config.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!();

        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_validate_defaults() {
        let args = ValidateArgs {};
        assert_eq!(args.execute(None).await.unwrap(), EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_validate_bad_pattern() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "personal_info_patterns:\n  - keys: ['(unclosed']\n    type: name").unwrap();

        let args = ValidateArgs {};
        assert_eq!(
            args.execute(Some(file.path())).await.unwrap(),
            EXIT_CONFIG_ERROR
        );
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let args = ValidateArgs {};
        assert_eq!(
            args.execute(Some(Path::new("missing.yaml"))).await.unwrap(),
            EXIT_CONFIG_ERROR
        );
    }

    #[tokio::test]
    async fn test_validate_rule_without_keys() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "personal_info_patterns:\n  - keys: []\n    type: name").unwrap();

        let args = ValidateArgs {};
        assert_eq!(args.execute(Some(file.path())).await.unwrap(), EXIT_SUCCESS);
    }
}
