//! Init command implementation
//!
//! This module implements the `init` command for generating a starter YAML
//! configuration containing the built-in pattern rules.

use crate::anonymization::detector::patterns::default_definitions;
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use crate::config::AnonymockConfig;
use clap::Args;
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "\
# Anonymock Configuration File
# Consistent anonymization of personal data in Wiremock mappings
#
# personal_info_patterns are evaluated in order; the first rule with a key
# pattern found in the field name, and whose value pattern (if any) matches
# the value, decides the type. Rules without keys never match.

";

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "anonymock.yaml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output.display(), "Initializing configuration file");

        if self.output.exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output.display());
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let content = generate_config()?;

        match fs::write(&self.output, content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output.display());
                println!();
                println!("Next steps:");
                println!("  1. Adjust personal_info_patterns in {}", self.output.display());
                println!(
                    "  2. Validate configuration: anonymock -c {} validate-config",
                    self.output.display()
                );
                println!(
                    "  3. Preview detections: anonymock -c {} scan <mappings>",
                    self.output.display()
                );
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

/// Starter configuration with every section and the built-in rules
pub fn generate_config() -> anyhow::Result<String> {
    let config = AnonymockConfig {
        personal_info_patterns: default_definitions()?,
        ..Default::default()
    };
    let body = serde_yaml::to_string(&config)?;
    Ok(format!("{HEADER}{body}"))
}
