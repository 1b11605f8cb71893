//! Guarded copy of a source file into the archive.
//!
//! A destination path is never overwritten. New files are written to a
//! temporary sibling, synced, and only then linked into place, so a crash
//! cannot leave a truncated file under the final name. Every placement ends
//! with a re-hash of the destination.
//!
//! A run killed mid-copy leaves its `.import-*.part` temporary behind.
//! [`sweep_partial_files`] removes those before the next run starts copying.
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

use log::{error, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::logging::{log_file_error, log_fs_modification};
use crate::processing::{compute_content_hash, verify_file};
use crate::types::ContentHash;

const PARTIAL_PREFIX: &str = ".import-";
const PARTIAL_SUFFIX: &str = ".part";

/// How the destination came to hold the expected content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Bytes were copied from the source
    Copied,

    /// The destination already held matching content; nothing was written
    AlreadyPresent,
}

/// Copy `src` to `dst` unless `dst` already holds `expected`, then validate `dst`
pub fn place_file(src: &Path, dst: &Path, expected: &ContentHash) -> Result<Placement> {
    let src_meta = fs::metadata(src)?;
    if !src_meta.is_file() {
        return Err(Error::NonRegularSource(src.to_path_buf()));
    }

    let placement = if dst.exists() {
        // Removing such a source afterwards would delete the archive copy
        if same_file::is_same_file(src, dst)? {
            return Err(Error::SourceIsDestination(src.to_path_buf()));
        }
        check_existing(dst, expected)?
    } else {
        copy_new(src, &src_meta, dst, expected)?
    };

    if let Err(e) = verify_file(dst, expected) {
        error!(
            "INTEGRITY FAILURE - destination may be corrupt: {} ({})",
            dst.display(),
            e
        );
        return Err(e);
    }

    Ok(placement)
}

fn check_existing(dst: &Path, expected: &ContentHash) -> Result<Placement> {
    let existing = compute_content_hash(dst)?;
    if existing != *expected {
        return Err(Error::ContentConflict(dst.to_path_buf()));
    }
    Ok(Placement::AlreadyPresent)
}

fn copy_new(
    src: &Path,
    src_meta: &fs::Metadata,
    dst: &Path,
    expected: &ContentHash,
) -> Result<Placement> {
    let dst_dir = dst
        .parent()
        .ok_or_else(|| Error::FileNotFound(dst.to_path_buf()))?;
    if !dst_dir.exists() {
        fs::create_dir_all(dst_dir)?;
        log_fs_modification("create_dir", dst_dir, None);
    }

    let mut partial = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(dst_dir)?;

    let mut src_file = File::open(src)?;
    io::copy(&mut src_file, partial.as_file_mut())?;
    partial.as_file().sync_all()?;

    let modified = src_meta.modified()?;
    partial
        .as_file()
        .set_times(FileTimes::new().set_accessed(modified).set_modified(modified))?;

    match partial.persist_noclobber(dst) {
        Ok(_) => {
            log_fs_modification("copy", dst, Some(&format!("from {}", src.display())));
            Ok(Placement::Copied)
        }
        // Another writer placed the file between the existence check and now
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => check_existing(dst, expected),
        Err(e) => Err(Error::Io(e.error)),
    }
}

/// Remove temporaries left under `archive_root` by an interrupted copy
///
/// Must not run while another import into the same archive is copying.
/// Returns the number of files removed.
pub fn sweep_partial_files(archive_root: &Path) -> Result<usize> {
    if !archive_root.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in WalkDir::new(archive_root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable archive entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_partial_file(entry.path()) {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                log_fs_modification("remove_partial", entry.path(), None);
                removed += 1;
            }
            Err(e) => log_file_error(entry.path(), "remove_partial", &e),
        }
    }
    Ok(removed)
}

fn is_partial_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(PARTIAL_PREFIX) && name.ends_with(PARTIAL_SUFFIX))
}
