//! Audit logging module
//!
//! Records one entry per anonymized document with hashed original values.

pub mod logger;

pub use logger::{hash_value, AuditLogger};
