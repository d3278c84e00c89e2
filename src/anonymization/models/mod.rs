//! Data models shared by the anonymization pipeline

pub mod pii_entity;

pub use pii_entity::{AnonymizedDocument, Identification, PiiCategory};
