//! The ingestion pipeline: dataset directories in, persisted indexes out.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{info, warn};

use htm::Mesh;
use storage::{dataset_fingerprint, Catalog, DatasetIndex, IndexMeta};
use wind_common::{GeodeticPoint, Sample, WindError, WindResult};

use crate::config::IngestConfig;
use crate::layers::{discover_raw_files, layer_name, parse_raw_file};
use crate::meta::DatasetMeta;

/// What happened to one dataset during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new index was built and committed.
    Ingested,
    /// The source fingerprint matched the persisted index; nothing to do.
    Skipped,
}

/// Per-run summary across all datasets.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub ingested: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Orchestrates projection, assignment, and persistence for dataset
/// directories.
pub struct IngestionPipeline {
    config: IngestConfig,
    mesh: Mesh,
    catalog: Catalog,
    in_flight: Mutex<HashSet<String>>,
}

impl IngestionPipeline {
    /// Create a pipeline writing indexes through the given catalog.
    pub fn new(config: IngestConfig, catalog: Catalog) -> Self {
        let mesh = Mesh::new(config.mesh_depth);
        Self {
            config,
            mesh,
            catalog,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Ingest every dataset directory under `input_dir`.
    ///
    /// A dataset that fails any step is reported and skipped; the batch
    /// continues with the remaining datasets.
    pub fn run(&self, input_dir: &Path) -> WindResult<IngestReport> {
        let mut dataset_dirs: Vec<_> = fs::read_dir(input_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter(|path| {
                path.file_name()
                    .map(|n| !n.to_string_lossy().starts_with('.'))
                    .unwrap_or(false)
            })
            .collect();
        dataset_dirs.sort();

        fs::create_dir_all(self.catalog.data_dir())?;

        let mut report = IngestReport::default();

        for dir in dataset_dirs {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            match self.ingest_dataset(&name, &dir) {
                Ok(IngestOutcome::Ingested) => report.ingested.push(name),
                Ok(IngestOutcome::Skipped) => {
                    info!(dataset = %name, "Source unchanged, skipping");
                    report.skipped.push(name);
                }
                Err(e) => {
                    warn!(dataset = %name, error = %e, "Dataset ingestion failed");
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        info!(
            ingested = report.ingested.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Ingestion run finished"
        );

        Ok(report)
    }

    /// Ingest one dataset directory.
    pub fn ingest_dataset(&self, name: &str, dir: &Path) -> WindResult<IngestOutcome> {
        let _guard = SingleFlight::acquire(&self.in_flight, name)?;

        let fingerprint = dataset_fingerprint(dir).map_err(|e| WindError::InvalidMeta {
            dataset: name.to_string(),
            message: e.to_string(),
        })?;

        if let Ok(Some(existing)) = self.catalog.load_index(name) {
            if existing.fingerprint == fingerprint {
                return Ok(IngestOutcome::Skipped);
            }
        }

        let meta = DatasetMeta::load(name, dir)?;
        let grid = meta.to_grid(name)?;

        let (lower_left, upper_right) = grid.geodetic_corners()?;
        info!(
            dataset = %name,
            zone = meta.utm_zone,
            hemisphere = %meta.utm_hemisphere,
            lat_min = lower_left.lat,
            lon_min = lower_left.lon,
            lat_max = upper_right.lat,
            lon_max = upper_right.lon,
            "Resolved dataset bounds"
        );

        let raw_files = discover_raw_files(dir)?;
        if raw_files.is_empty() {
            return Err(WindError::InvalidMeta {
                dataset: name.to_string(),
                message: "no raw sample files found".to_string(),
            });
        }

        let mut layers = Vec::new();
        let mut overviews = BTreeMap::new();
        let mut all_samples = Vec::new();

        for path in &raw_files {
            let layer = layer_name(path);
            if layers.contains(&layer) {
                return Err(WindError::InvalidMeta {
                    dataset: name.to_string(),
                    message: format!("duplicate layer name: {}", layer),
                });
            }

            let rows = parse_raw_file(path)?;

            // Project in file order so the overview decimation below stays
            // deterministic across runs.
            let mut samples = Vec::with_capacity(rows.len());
            for row in rows {
                let point = grid.to_geodetic(row.x, row.y)?;
                samples.push(Sample::new(point.lat, point.lon, row.z, row.u, row.v, row.w));
            }

            let overview: Vec<Sample> = samples
                .iter()
                .step_by(self.config.overview_stride)
                .copied()
                .collect();

            info!(
                dataset = %name,
                layer = %layer,
                samples = samples.len(),
                overview = overview.len(),
                "Parsed layer"
            );

            overviews.insert(layer.clone(), overview);
            layers.push(layer);
            all_samples.extend(samples);
        }

        let trixels = self.assign_samples(&all_samples)?;

        // file-name order drove parsing; the published layer list is sorted
        // by layer name like the overview map
        layers.sort();

        let index = DatasetIndex {
            name: name.to_string(),
            meta: IndexMeta {
                utm_zone: meta.utm_zone,
                utm_hemisphere: meta.utm_hemisphere.clone(),
                utm_corners: meta.utm_corners,
                coordinates_relative: meta.coordinates_relative,
            },
            fingerprint,
            mesh_depth: self.config.mesh_depth,
            ingested_at: Utc::now(),
            layers,
            overviews,
            trixels,
        };

        index.persist(self.catalog.data_dir())?;

        info!(
            dataset = %name,
            samples = all_samples.len(),
            trixels = index.trixels.len(),
            "Committed dataset index"
        );

        Ok(IngestOutcome::Ingested)
    }

    /// Assign samples to leaf trixels in parallel.
    ///
    /// Each assignment is independent; workers fold into per-shard maps
    /// which are merged once at the end, so merge order never affects the
    /// result beyond map iteration order.
    fn assign_samples(&self, samples: &[Sample]) -> WindResult<HashMap<String, Vec<Sample>>> {
        samples
            .par_iter()
            .map(|sample| {
                let trixel = self.mesh.assign(GeodeticPoint::new(sample.lat, sample.lon))?;
                Ok((trixel.name, *sample))
            })
            .try_fold(HashMap::new, |mut shard: HashMap<String, Vec<Sample>>, row: WindResult<(String, Sample)>| {
                let (name, sample) = row?;
                shard.entry(name).or_default().push(sample);
                Ok(shard)
            })
            .try_reduce(HashMap::new, |mut merged, shard| {
                for (name, mut samples) in shard {
                    merged.entry(name).or_default().append(&mut samples);
                }
                Ok(merged)
            })
    }
}

/// Per-dataset single-flight guard: no two concurrent ingestion runs for
/// the same dataset name.
struct SingleFlight<'a> {
    set: &'a Mutex<HashSet<String>>,
    name: String,
}

impl<'a> SingleFlight<'a> {
    fn acquire(set: &'a Mutex<HashSet<String>>, name: &str) -> WindResult<Self> {
        let mut guard = set
            .lock()
            .map_err(|_| WindError::InternalError("single-flight lock poisoned".to_string()))?;
        if !guard.insert(name.to_string()) {
            return Err(WindError::InternalError(format!(
                "dataset {} is already being ingested",
                name
            )));
        }
        Ok(Self {
            set,
            name: name.to_string(),
        })
    }
}

impl Drop for SingleFlight<'_> {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.set.lock() {
            guard.remove(&self.name);
        }
    }
}
