//! The persisted per-dataset index.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wind_common::{Sample, WindError, WindResult};

/// Echo of the ingestion descriptor, kept with the index so a persisted
/// dataset is self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMeta {
    pub utm_zone: i64,
    pub utm_hemisphere: String,
    pub utm_corners: [[f64; 2]; 2],
    #[serde(default)]
    pub coordinates_relative: bool,
}

/// One dataset's complete spatial index.
///
/// Built by a single ingestion run and replaced wholesale on re-ingestion;
/// readers only ever see a fully built value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetIndex {
    pub name: String,
    pub meta: IndexMeta,
    /// CRC32 over the source descriptor and raw files; unchanged sources
    /// are skipped on re-ingestion.
    pub fingerprint: u32,
    /// Leaf depth of the mesh used at ingest time.
    pub mesh_depth: usize,
    pub ingested_at: DateTime<Utc>,
    /// Sorted layer names (one per raw file).
    pub layers: Vec<String>,
    /// Decimated per-layer overviews for the simplified query.
    pub overviews: BTreeMap<String, Vec<Sample>>,
    /// Leaf trixel name to the samples it contains, all layers combined.
    pub trixels: HashMap<String, Vec<Sample>>,
}

impl DatasetIndex {
    /// Sorted layer names.
    pub fn layer_names(&self) -> Vec<String> {
        self.layers.clone()
    }

    /// The precomputed overview for one layer.
    pub fn overview(&self, layer: &str) -> WindResult<&[Sample]> {
        self.overviews
            .get(layer)
            .map(Vec::as_slice)
            .ok_or_else(|| WindError::LayerNotFound(layer.to_string()))
    }

    /// Batch per-trixel sample lookup.
    ///
    /// An empty name list returns an empty map without touching the index;
    /// unknown names map to empty sequences (lookup-miss, not an error).
    pub fn samples_by_trixel_names(&self, names: &[String]) -> BTreeMap<String, Vec<Sample>> {
        names
            .iter()
            .map(|name| {
                let samples = self.trixels.get(name).cloned().unwrap_or_default();
                (name.clone(), samples)
            })
            .collect()
    }

    /// Write the index under `dir` as `<name>/index.json`.
    ///
    /// The file is staged in a temp file and renamed into place, so a
    /// crashed run never leaves a partial index behind.
    pub fn persist(&self, dir: &Path) -> WindResult<()> {
        let dataset_dir = dir.join(&self.name);
        fs::create_dir_all(&dataset_dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dataset_dir)
            .map_err(|e| WindError::StorageError(format!("temp file: {}", e)))?;
        serde_json::to_writer(&mut tmp, self)?;
        tmp.flush()?;
        tmp.persist(dataset_dir.join("index.json"))
            .map_err(|e| WindError::StorageError(format!("commit index: {}", e)))?;

        Ok(())
    }

    /// Load an index from its `index.json` path.
    pub fn load(path: &Path) -> WindResult<DatasetIndex> {
        let file = fs::File::open(path)?;
        let index = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_index() -> DatasetIndex {
        let mut trixels = HashMap::new();
        trixels.insert(
            "N0-1".to_string(),
            vec![Sample::new(52.5, 13.3, 80.0, 1.0, 2.0, 0.1)],
        );

        let mut overviews = BTreeMap::new();
        overviews.insert(
            "wind-80m".to_string(),
            vec![Sample::new(52.5, 13.3, 80.0, 1.0, 2.0, 0.1)],
        );

        DatasetIndex {
            name: "city-block".to_string(),
            meta: IndexMeta {
                utm_zone: 33,
                utm_hemisphere: "N".to_string(),
                utm_corners: [[383_900.0, 5_818_000.0], [385_900.0, 5_820_000.0]],
                coordinates_relative: false,
            },
            fingerprint: 0xDEAD_BEEF,
            mesh_depth: 8,
            ingested_at: Utc::now(),
            layers: vec!["wind-80m".to_string()],
            overviews,
            trixels,
        }
    }

    #[test]
    fn test_overview_unknown_layer_is_an_error() {
        let index = small_index();
        assert!(index.overview("wind-80m").is_ok());
        assert!(matches!(
            index.overview("wind-120m"),
            Err(WindError::LayerNotFound(_))
        ));
    }

    #[test]
    fn test_batch_lookup_empty_and_unknown_names() {
        let index = small_index();

        assert!(index.samples_by_trixel_names(&[]).is_empty());

        let result = index.samples_by_trixel_names(&["nonexistent-name".to_string()]);
        assert_eq!(result.len(), 1);
        assert!(result["nonexistent-name"].is_empty());

        let result = index.samples_by_trixel_names(&["N0-1".to_string()]);
        assert_eq!(result["N0-1"].len(), 1);
    }

    #[test]
    fn test_persist_then_load_preserves_index() {
        let dir = tempfile::tempdir().unwrap();
        let index = small_index();
        index.persist(dir.path()).unwrap();

        let loaded = DatasetIndex::load(&dir.path().join("city-block/index.json")).unwrap();
        assert_eq!(loaded.name, index.name);
        assert_eq!(loaded.fingerprint, index.fingerprint);
        assert_eq!(loaded.layers, index.layers);
        assert_eq!(loaded.trixels["N0-1"], index.trixels["N0-1"]);
    }
}
