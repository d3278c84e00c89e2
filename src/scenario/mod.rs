//! Batch processing of Wiremock scenarios
//!
//! A scenario is a set of mapping files anonymized together with one shared
//! ledger, so the same personal value is replaced identically in every file.

pub mod processor;
pub mod summary;

pub use processor::{ScenarioProcessor, DEFAULT_CONCURRENCY};
pub use summary::{FileStatus, ProcessedFile, ScenarioSummary};
