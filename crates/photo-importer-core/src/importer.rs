use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Instant;

use crate::config::Config;
use crate::destination::resolve_destination;
use crate::discovery::discover_candidates;
use crate::error::{Error, Result};
use crate::logging::{log_file_error, log_fs_modification};
use crate::persistence::ImportIndex;
use crate::processing::extract_identity;
use crate::safety::{place_file, sweep_partial_files, Placement};
use crate::types::CandidateFile;

/// Result of importing one candidate file
#[derive(Debug)]
pub enum ImportStatus {
    /// Content is in the archive and committed to the index
    Imported {
        destination: PathBuf,
        placement: Placement,
        source_removed: bool,
    },

    /// The index already holds this identity
    Skipped,

    /// Dry run: the file would be placed here
    WouldImport { destination: PathBuf },

    /// The file could not be imported; nothing was committed
    Failed(Error),

    /// The run was stopped before this file was reached
    NotAttempted,
}

/// Per-file outcome, keyed by source path
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub status: ImportStatus,
}

/// Aggregated outcome of a run
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub outcomes: Vec<FileOutcome>,
    pub interrupted: bool,
}

impl ImportSummary {
    fn count(&self, pred: impl Fn(&ImportStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn imported(&self) -> usize {
        self.count(|s| matches!(s, ImportStatus::Imported { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ImportStatus::Skipped))
    }

    pub fn planned(&self) -> usize {
        self.count(|s| matches!(s, ImportStatus::WouldImport { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ImportStatus::Failed(_)))
    }

    pub fn not_attempted(&self) -> usize {
        self.count(|s| matches!(s, ImportStatus::NotAttempted))
    }

    /// Log every per-file outcome followed by the totals
    pub fn log_report(&self) {
        for outcome in &self.outcomes {
            let file = outcome.source.display();
            match &outcome.status {
                ImportStatus::Imported {
                    destination,
                    placement,
                    source_removed,
                } => {
                    let how = match placement {
                        Placement::Copied => "copied",
                        Placement::AlreadyPresent => "already in archive",
                    };
                    let removed = if *source_removed { ", source removed" } else { "" };
                    info!("{}: imported to {} ({}{})", file, destination.display(), how, removed);
                }
                ImportStatus::Skipped => info!("{}: already processed before, SKIP", file),
                ImportStatus::WouldImport { destination } => {
                    info!("{}: would import to {}", file, destination.display())
                }
                ImportStatus::Failed(e) => error!("{}: {}", file, e),
                ImportStatus::NotAttempted => debug!("{}: not attempted", file),
            }
        }

        info!(
            "{} imported, {} skipped, {} planned, {} failed{}",
            self.imported(),
            self.skipped(),
            self.planned(),
            self.failed(),
            if self.interrupted {
                format!(", {} not attempted (interrupted)", self.not_attempted())
            } else {
                String::new()
            }
        );
    }
}

/// Serializes work on one identity across workers
///
/// Byte-identical files with the same capture time map to the same index key
/// and destination; only one of them may be between lookup and commit.
#[derive(Default)]
struct KeyLocks {
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    key: String,
}

impl KeyLocks {
    fn acquire(&self, key: String) -> KeyGuard<'_> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(&key) {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(key.clone());
        KeyGuard { locks: self, key }
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        let mut held = self
            .locks
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.key);
        self.locks.released.notify_all();
    }
}

/// Main entry point for the import process
pub struct ImageImporter {
    config: Config,
    index: Arc<dyn ImportIndex>,
    claims: KeyLocks,
    shutdown_requested: Arc<AtomicBool>,
}

impl ImageImporter {
    /// Create an importer over an already-opened index
    pub fn new(config: Config, index: Arc<dyn ImportIndex>) -> Self {
        Self {
            config,
            index,
            claims: KeyLocks::default(),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the run at the next file boundary when set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown_requested)
    }

    /// Discover candidates under the configured source
    pub fn discover(&self) -> Result<Vec<CandidateFile>> {
        discover_candidates(&self.config.source, &self.config)
    }

    /// Run the full import pipeline
    pub fn run(&self) -> Result<ImportSummary> {
        info!("Discovering images in {}", self.config.source.display());
        let candidates = self.discover()?;
        info!("Found {} candidate images", candidates.len());

        if !self.config.dry_run {
            let removed = sweep_partial_files(&self.config.destination)?;
            if removed > 0 {
                warn!("Removed {} unfinished copies from an earlier run", removed);
            }
        }

        self.import_all(&candidates)
    }

    /// Import every candidate on a bounded worker pool
    pub fn import_all(&self, candidates: &[CandidateFile]) -> Result<ImportSummary> {
        let start_time = Instant::now();
        let threads = self.config.worker_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build thread pool: {}", e)))?;

        let progress_bar = self.progress_bar(candidates.len());

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            candidates
                .par_iter()
                .map(|candidate| {
                    let status = if self.shutdown_requested.load(Ordering::SeqCst) {
                        ImportStatus::NotAttempted
                    } else {
                        self.import_file(candidate)
                    };
                    progress_bar.inc(1);
                    FileOutcome {
                        source: candidate.path.clone(),
                        status,
                    }
                })
                .collect()
        });

        progress_bar.finish_with_message("Import finished");

        let summary = ImportSummary {
            interrupted: outcomes
                .iter()
                .any(|o| matches!(o.status, ImportStatus::NotAttempted)),
            outcomes,
        };

        info!(
            "Processed {} files in {:.1}s with {} threads",
            summary.outcomes.len(),
            start_time.elapsed().as_secs_f64(),
            threads
        );

        Ok(summary)
    }

    /// Import a single candidate file
    ///
    /// Never panics or aborts on a per-file problem; every failure is
    /// returned as `ImportStatus::Failed`.
    pub fn import_file(&self, candidate: &CandidateFile) -> ImportStatus {
        let file = candidate.path.display();
        debug!("Processing {}", file);

        let identity = match extract_identity(candidate) {
            Ok(identity) => identity,
            Err(e) => return ImportStatus::Failed(e),
        };
        let datetime_key = identity.datetime_key();
        let hash = identity.hash_hex();

        let _claim = self.claims.acquire(format!("{}_{}", datetime_key, hash));

        // An unreadable index must not hide a file from import
        let processed = self
            .index
            .contains(&datetime_key, &hash)
            .unwrap_or_else(|e| {
                warn!("Index lookup failed for {}, treating as new: {}", file, e);
                false
            });

        if processed && !self.config.force {
            debug!("Already processed before: {}", file);
            return ImportStatus::Skipped;
        }

        let destination =
            resolve_destination(&identity, &candidate.extension, &self.config.destination);

        if self.config.dry_run {
            return ImportStatus::WouldImport { destination };
        }

        let placement = match place_file(&candidate.path, &destination, &identity.content_hash) {
            Ok(placement) => placement,
            Err(e) => return ImportStatus::Failed(e),
        };

        if !processed {
            if let Err(e) = self.index.insert(&datetime_key, &hash) {
                warn!(
                    "Failed to record {} ({}_{}) in index, it may be imported again: {}",
                    file, datetime_key, hash, e
                );
            }
        }

        let source_removed = self.config.delete_source && self.remove_source(candidate);

        ImportStatus::Imported {
            destination,
            placement,
            source_removed,
        }
    }

    fn remove_source(&self, candidate: &CandidateFile) -> bool {
        match fs::remove_file(&candidate.path) {
            Ok(()) => {
                log_fs_modification("delete", &candidate.path, None);
                true
            }
            Err(e) => {
                log_file_error(&candidate.path, "delete", &e);
                false
            }
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")
        {
            progress_bar.set_style(style.progress_chars("##-"));
        }
        progress_bar
    }
}
