#![allow(dead_code)]

pub mod test_images;
pub use test_images::*;

use std::path::PathBuf;
use std::sync::Arc;

use photo_importer_core::{Config, ImageImporter, SqliteIndex};
use tempfile::TempDir;

/// A scratch source tree, archive root and index database
pub struct Workspace {
    pub dir: TempDir,
    pub source: PathBuf,
    pub archive: PathBuf,
    pub index: Arc<SqliteIndex>,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("card");
        let archive = dir.path().join("archive");
        std::fs::create_dir_all(&source).unwrap();

        let index = Arc::new(SqliteIndex::open(&dir.path().join("db/index.sqlite3")).unwrap());

        Self {
            dir,
            source,
            archive,
            index,
        }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::new(&self.source, &self.archive);
        config.database_path = self.dir.path().join("db/index.sqlite3");
        config.threads = 2;
        config
    }

    pub fn importer(&self, config: Config) -> ImageImporter {
        ImageImporter::new(config, self.index.clone())
    }

    pub fn records(&self) -> usize {
        self.index.record_count().unwrap()
    }
}
