//! Error context extension trait
//!
//! Adds `anyhow`-style `.context()` / `.with_context()` to
//! `Result<T, AnonymockError>` so library code can annotate failures without
//! leaving the domain error type.
//!
//! # Examples
//!
//! ```rust
//! use anonymock::domain::Result;
//! use anonymock::domain::context::ResultExt;
//!
//! fn read_ledger(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read ledger file: {path}"))
//! }
//! ```

use crate::domain::errors::AnonymockError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (evaluated eagerly)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure, evaluated only on failure
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AnonymockError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| AnonymockError::Other(format!("{context}: {}", e.into())))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let base_error = e.into();
            AnonymockError::Other(format!("{}: {base_error}", f()))
        })
    }
}
