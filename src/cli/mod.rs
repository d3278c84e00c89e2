//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Anonymock using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Exit code for a run where every file succeeded
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when at least one file failed
pub const EXIT_PARTIAL_FAILURE: i32 = 1;
/// Exit code for configuration errors
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Exit code for fatal errors
pub const EXIT_FATAL: i32 = 5;
/// Exit code when a shutdown signal interrupted the run
pub const EXIT_INTERRUPTED: i32 = 130;

/// Anonymock - consistent anonymization of personal data in Wiremock mappings
#[derive(Parser, Debug)]
#[command(name = "anonymock")]
#[command(version, about, long_about = None)]
#[command(author = "Anonymock Contributors")]
pub struct Cli {
    /// Path to configuration file (YAML, JSON or TOML); built-in rules when omitted
    #[arg(short, long, env = "ANONYMOCK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ANONYMOCK_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a mapping file or every JSON file under a directory
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Report detected personal data without changing anything
    Scan(commands::scan::ScanArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
