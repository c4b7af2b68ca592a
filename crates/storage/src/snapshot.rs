//! Immutable query snapshots with atomic replacement.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use wind_common::{WindError, WindResult};

use crate::index::DatasetIndex;

/// A complete, immutable view of every loaded dataset index.
///
/// Query handlers hold an `Arc<Snapshot>` for the duration of a request;
/// re-ingestion publishes a new snapshot without disturbing them.
#[derive(Debug, Default)]
pub struct Snapshot {
    datasets: HashMap<String, Arc<DatasetIndex>>,
}

impl Snapshot {
    pub fn new(datasets: HashMap<String, Arc<DatasetIndex>>) -> Self {
        Self { datasets }
    }

    /// Dataset names mapped to their sorted layer names.
    pub fn list_datasets(&self) -> BTreeMap<String, Vec<String>> {
        self.datasets
            .iter()
            .map(|(name, index)| (name.clone(), index.layer_names()))
            .collect()
    }

    /// Look up one dataset's index.
    pub fn dataset(&self, name: &str) -> WindResult<&Arc<DatasetIndex>> {
        self.datasets
            .get(name)
            .ok_or_else(|| WindError::DatasetNotFound(name.to_string()))
    }

    /// Mesh depth recorded by the loaded indexes, if any were loaded.
    ///
    /// Depth is an ingestion-time constant; every index in a consistent
    /// deployment carries the same value.
    pub fn mesh_depth(&self) -> Option<usize> {
        self.datasets.values().map(|index| index.mesh_depth).max()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Versioned pointer to the current snapshot.
///
/// Readers clone the inner `Arc` and never block writers; `swap` publishes
/// a fully built snapshot in one step so no reader observes a partially
/// rebuilt index.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The current snapshot.
    pub async fn get(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    /// Atomically replace the published snapshot.
    pub async fn swap(&self, snapshot: Snapshot) {
        *self.current.write().await = Arc::new(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_swap_publishes_new_snapshot_without_touching_old() {
        let store = SnapshotStore::new(Snapshot::default());
        let old = store.get().await;
        assert!(old.is_empty());

        let mut datasets = HashMap::new();
        datasets.insert(
            "fresh".to_string(),
            Arc::new(DatasetIndex {
                name: "fresh".to_string(),
                meta: crate::index::IndexMeta {
                    utm_zone: 33,
                    utm_hemisphere: "N".to_string(),
                    utm_corners: [[0.0, 0.0], [1.0, 1.0]],
                    coordinates_relative: false,
                },
                fingerprint: 1,
                mesh_depth: 8,
                ingested_at: chrono::Utc::now(),
                layers: vec![],
                overviews: BTreeMap::new(),
                trixels: HashMap::new(),
            }),
        );
        store.swap(Snapshot::new(datasets)).await;

        // the reader that grabbed the old snapshot still sees it
        assert!(old.is_empty());
        assert_eq!(store.get().await.len(), 1);
    }

    #[test]
    fn test_unknown_dataset_is_an_error() {
        let snapshot = Snapshot::default();
        assert!(matches!(
            snapshot.dataset("ghost"),
            Err(WindError::DatasetNotFound(_))
        ));
    }
}
