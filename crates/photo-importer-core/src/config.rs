use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Configuration for an import run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory tree to import from
    pub source: PathBuf,

    /// Archive root to place imported files under
    pub destination: PathBuf,

    /// Path to the dedup index database
    pub database_path: PathBuf,

    /// Whether to delete source files once they are imported
    pub delete_source: bool,

    /// Whether to import again even if the index marks a file as processed
    pub force: bool,

    /// Whether to report planned placements without touching the filesystem
    pub dry_run: bool,

    /// Skip candidates whose path contains this substring
    pub exclude: Option<String>,

    /// Maximum directory depth for scanning
    pub max_depth: Option<usize>,

    /// Number of threads to use for processing (0 = auto)
    pub threads: usize,

    /// Whether to draw a progress bar
    pub show_progress: bool,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            database_path: default_database_path(),
            delete_source: false,
            force: false,
            dry_run: false,
            exclude: None,
            max_depth: None,
            threads: 0, // Auto
            show_progress: false,
            log_level: LogLevel::Info,
        }
    }
}

/// `~/.photo-importer/photo-importer.sqlite3`, or a relative path when no home directory is known
pub fn default_database_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".photo-importer")
        .join("photo-importer.sqlite3")
}

impl Config {
    /// Create a configuration for importing `source` into `destination`
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Effective worker count
    pub fn worker_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "Source directory must be specified".to_string(),
            ));
        }

        if !self.source.is_dir() {
            return Err(Error::Configuration(format!(
                "Source {} is not a directory",
                self.source.display()
            )));
        }

        if self.destination.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "Destination directory must be specified".to_string(),
            ));
        }

        // An archive inside the source tree would be re-imported on the next run
        if resolve_path(&self.destination)?.starts_with(resolve_path(&self.source)?) {
            return Err(Error::Configuration(format!(
                "Destination {} must not be inside source {}",
                self.destination.display(),
                self.source.display()
            )));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "Database path must be specified".to_string(),
            ));
        }

        Ok(())
    }
}

/// Absolute, symlink-free form of `path`
///
/// The longest existing prefix is canonicalized and the components that do
/// not exist yet are appended unchanged.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::env::current_dir()?.join(path);
    for existing in absolute.ancestors() {
        if let Ok(base) = existing.canonicalize() {
            let rest = absolute.strip_prefix(existing).unwrap_or(Path::new(""));
            return Ok(base.join(rest));
        }
    }
    Ok(absolute)
}
