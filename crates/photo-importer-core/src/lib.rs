//! Core functionality for importing photos into a date-partitioned archive.
//!
//! This library provides the components of the import pipeline:
//! - Candidate discovery by extension
//! - Capture identity derivation (content hash + capture date)
//! - A persisted dedup index of already-imported identities
//! - Guarded copy with post-copy validation
//! - The orchestrator that sequences them per file

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::{default_database_path, Config, LogLevel};
pub use error::{Error, Result};
pub use importer::{FileOutcome, ImageImporter, ImportStatus, ImportSummary};
pub use persistence::{ImportIndex, SqliteIndex};
pub use safety::Placement;
pub use types::*;

// -- Public Modules --
pub mod config;
pub mod destination;
pub mod discovery;
pub mod importer;
pub mod logging;
pub mod persistence;
pub mod processing;
pub mod safety;
pub mod types;

// -- Test Modules --
#[cfg(test)]
pub mod test_utils;
