//! Persisted dataset indexes and the in-memory query snapshot.

pub mod catalog;
pub mod fingerprint;
pub mod index;
pub mod snapshot;

pub use catalog::Catalog;
pub use fingerprint::dataset_fingerprint;
pub use index::{DatasetIndex, IndexMeta};
pub use snapshot::{Snapshot, SnapshotStore};
