//! Domain types for Anonymock.
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, AnonymockError>`]:
//!
//! ```rust,no_run
//! use anonymock::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = anonymock::config::load_config("anonymock.yaml")?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod errors;
pub mod result;

pub use context::ResultExt;
pub use errors::AnonymockError;
pub use result::Result;
