use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the photo-importer library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found error
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Source is a directory, symlink target, device or other non-regular entry
    #[error("Can not copy non-regular source file {0}")]
    NonRegularSource(PathBuf),

    /// Source and destination resolve to the same file on disk
    #[error("Source {0} is its own destination")]
    SourceIsDestination(PathBuf),

    /// Destination exists with different content
    #[error("Destination {0} already exists and has different content")]
    ContentConflict(PathBuf),

    /// Destination does not hash to the expected value after placement
    #[error("Integrity check failed for {path}: expected {expected}, found {actual}")]
    IntegrityMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Dedup index failure
    #[error("Index error: {0}")]
    Index(#[from] rusqlite::Error),
}
