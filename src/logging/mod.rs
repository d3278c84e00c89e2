//! Logging and observability
//!
//! Structured logging through `tracing`, with a console layer and an optional
//! JSON file layer. Personal data never appears in log fields: documents are
//! referred to by path and values only by type.
//!
//! # Example
//!
//! ```no_run
//! use anonymock::logging::init_logging;
//! use anonymock::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a document
///
/// # Example
///
/// ```no_run
/// use anonymock::log_document_start;
///
/// log_document_start!("mappings/user.json");
/// ```
#[macro_export]
macro_rules! log_document_start {
    ($source:expr) => {
        tracing::debug!(source = %$source, "Processing document");
    };
}

/// Log the completion of a scenario
///
/// # Example
///
/// ```no_run
/// use anonymock::log_scenario_complete;
///
/// log_scenario_complete!("run-1", 10, 0, 42, 1500_u64);
/// ```
#[macro_export]
macro_rules! log_scenario_complete {
    ($run_id:expr, $succeeded:expr, $failed:expr, $replacements:expr, $duration_ms:expr) => {
        tracing::info!(
            run_id = %$run_id,
            succeeded = $succeeded,
            failed = $failed,
            replacements = $replacements,
            duration_ms = $duration_ms,
            "Scenario completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use anonymock::log_error_with_context;
/// use anonymock::domain::AnonymockError;
///
/// let error = AnonymockError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
