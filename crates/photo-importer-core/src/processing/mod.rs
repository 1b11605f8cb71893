// Core modules
mod capture_time;
mod crypto_hash;

// Expose content hash calculations
pub use crypto_hash::*;

pub use capture_time::{modification_time, try_extract_capture_time};

use crate::error::Result;
use crate::types::{CandidateFile, CaptureIdentity};

/// Derive the capture identity of a candidate file
///
/// The capture time comes from embedded metadata when present and decodable,
/// otherwise from the file's last-modified time. Only open/read failures are
/// returned as errors.
pub fn extract_identity(candidate: &CandidateFile) -> Result<CaptureIdentity> {
    let content_hash = compute_content_hash(&candidate.path)?;

    let datetime = match try_extract_capture_time(&candidate.path, candidate.kind) {
        Some(taken) => taken,
        None => modification_time(&candidate.path)?,
    };

    Ok(CaptureIdentity {
        datetime,
        content_hash,
    })
}

#[cfg(test)]
mod tests;
