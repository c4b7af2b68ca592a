//! Ingestion configuration.

use std::env;

/// Tunables for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Leaf depth of the trixel mesh. Must match between ingestion and
    /// querying; persisted with each index.
    pub mesh_depth: usize,

    /// Overview decimation: every Nth sample per layer, in file order.
    pub overview_stride: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mesh_depth: 20,
            overview_stride: 16,
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mesh_depth = env::var("INGEST_MESH_DEPTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.mesh_depth);

        let overview_stride = env::var("INGEST_OVERVIEW_STRIDE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.overview_stride);

        Self {
            mesh_depth,
            overview_stride,
        }
    }
}
