//! Discovery and loading of persisted dataset indexes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use wind_common::{WindError, WindResult};

use crate::index::DatasetIndex;
use crate::snapshot::Snapshot;

/// Filesystem catalog of persisted dataset indexes.
///
/// The on-disk layout is one directory per dataset under the data
/// directory, each holding an `index.json`.
#[derive(Debug, Clone)]
pub struct Catalog {
    data_dir: PathBuf,
}

impl Catalog {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of one dataset's persisted index.
    pub fn index_path(&self, dataset: &str) -> PathBuf {
        self.data_dir.join(dataset).join("index.json")
    }

    /// Load one dataset's persisted index, if present.
    pub fn load_index(&self, dataset: &str) -> WindResult<Option<DatasetIndex>> {
        let path = self.index_path(dataset);
        if !path.is_file() {
            return Ok(None);
        }
        DatasetIndex::load(&path).map(Some)
    }

    /// Load every persisted index into a complete, immutable snapshot.
    ///
    /// A dataset whose index fails to load is skipped with a warning; it
    /// is simply absent from the snapshot until re-ingested.
    pub fn load_snapshot(&self) -> WindResult<Snapshot> {
        let mut datasets = HashMap::new();

        if !self.data_dir.is_dir() {
            return Err(WindError::StorageError(format!(
                "data directory {} does not exist",
                self.data_dir.display()
            )));
        }

        for entry in std::fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            match self.load_index(&name) {
                Ok(Some(index)) => {
                    info!(dataset = %name, layers = index.layers.len(), "Loaded dataset index");
                    datasets.insert(name, Arc::new(index));
                }
                Ok(None) => {
                    warn!(dataset = %name, "Skipping dataset directory without index.json");
                }
                Err(e) => {
                    warn!(dataset = %name, error = %e, "Skipping unreadable dataset index");
                }
            }
        }

        Ok(Snapshot::new(datasets))
    }
}
