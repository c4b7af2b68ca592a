//! Application state and shared resources.

use std::env;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use storage::{Catalog, SnapshotStore};

use crate::metrics::MetricsCollector;

/// Default leaf depth when no index has been ingested yet; matches the
/// ingester default.
const DEFAULT_MESH_DEPTH: usize = 20;

/// Default cap on the trixels-in-radius query, in meters.
const DEFAULT_MAX_RADIUS_M: f64 = 1_000.0;

/// Shared application state.
pub struct AppState {
    pub catalog: Catalog,
    pub store: SnapshotStore,
    pub metrics: Arc<MetricsCollector>,
    pub default_mesh_depth: usize,
    pub max_radius_m: f64,
}

impl AppState {
    /// Load every persisted index and build the initial snapshot.
    pub async fn new() -> Result<Self> {
        let data_dir = env::var("WIND_DATA_DIR").unwrap_or_else(|_| "data/processed".to_string());

        let default_mesh_depth = env::var("WIND_API_MESH_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MESH_DEPTH);

        let max_radius_m = env::var("WIND_API_MAX_RADIUS_M")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_RADIUS_M);

        std::fs::create_dir_all(&data_dir)?;
        let catalog = Catalog::new(&data_dir);
        let snapshot = catalog.load_snapshot()?;

        info!(
            data_dir = %data_dir,
            datasets = snapshot.len(),
            "Loaded dataset indexes"
        );

        Ok(Self {
            catalog,
            store: SnapshotStore::new(snapshot),
            metrics: Arc::new(MetricsCollector::new()),
            default_mesh_depth,
            max_radius_m,
        })
    }
}
