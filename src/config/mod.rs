//! Configuration management for Anonymock.
//!
//! Configuration files may be YAML, JSON or TOML, selected by extension, with
//! support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ANONYMOCK_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation with descriptive messages
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use anonymock::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("anonymock.yaml")?;
//! println!("{} pattern rules", config.personal_info_patterns.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and dry-run flag
//! - `personal_info_patterns` - ordered detection rules (built-in rules when empty)
//! - `pattern_library` - TOML rule file replacing the inline rules
//! - [`ProcessingConfig`] - batch concurrency
//! - [`LedgerConfig`] - ledger persistence between runs
//! - `audit` - audit log settings
//! - [`LoggingConfig`] - optional JSON file logging
//!
//! # Example Configuration
//!
//! ```yaml
//! application:
//!   log_level: info
//!
//! personal_info_patterns:
//!   - keys: ["name", "userName", "nm"]
//!     type: name
//!   - keys: ["email", "mail"]
//!     type: email
//!     pattern: '[\w.+-]+@[\w-]+\.[\w.]+'
//!
//! ledger:
//!   path: ./state/ledger.json
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_or_default, ConfigFormat};
pub use schema::{AnonymockConfig, ApplicationConfig, LedgerConfig, LoggingConfig, ProcessingConfig};
