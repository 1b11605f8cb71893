use std::path::Path;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{CandidateFile, ImageKind};

/// Discover importable images under `root`
///
/// A regular file is a candidate when its extension is in the image table
/// and its path does not contain the configured exclude substring.
pub fn discover_candidates(root: &Path, config: &Config) -> Result<Vec<CandidateFile>> {
    if !root.exists() {
        return Err(Error::FileNotFound(root.to_path_buf()));
    }

    let max_depth = config.max_depth.unwrap_or(usize::MAX);
    let exclude = config.exclude.as_deref();

    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry during scan: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(kind) = image_kind(path) else {
            continue;
        };

        if is_excluded(path, exclude) {
            log::debug!("Excluded: {}", path.display());
            continue;
        }

        candidates.push(CandidateFile {
            path: path.to_path_buf(),
            kind,
            extension: lowercase_extension(path),
        });
    }

    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(candidates)
}

/// Get image kind from file extension
pub fn image_kind(path: &Path) -> Option<ImageKind> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageKind::from_extension)
}

/// Returns true if the path contains the (non-empty) exclude substring
pub fn is_excluded(path: &Path, exclude: Option<&str>) -> bool {
    match exclude {
        Some(pattern) if !pattern.is_empty() => path.to_string_lossy().contains(pattern),
        _ => false,
    }
}

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

// -- Tests --
