//! Content digests for import identity and post-copy validation.
//!
//! Files are streamed through MD5 in fixed-size chunks, so arbitrarily large
//! images are hashed in constant memory.
use md5::{Digest, Md5};
use std::{fs::File, io::Read, path::Path};

use crate::error::{Error, Result};
use crate::types::ContentHash;

const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the content hash of a file
pub fn compute_content_hash<P: AsRef<Path>>(path: P) -> Result<ContentHash> {
    let mut file = File::open(&path)?;
    let mut hasher = Md5::new();

    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let mut digest = [0u8; 16];
    digest.copy_from_slice(&hasher.finalize());
    Ok(ContentHash(digest))
}

/// Re-hash `path` and fail with `IntegrityMismatch` unless it equals `expected`
pub fn verify_file<P: AsRef<Path>>(path: P, expected: &ContentHash) -> Result<()> {
    let actual = compute_content_hash(&path)?;
    if actual != *expected {
        return Err(Error::IntegrityMismatch {
            path: path.as_ref().to_path_buf(),
            expected: expected.to_hex(),
            actual: actual.to_hex(),
        });
    }
    Ok(())
}
