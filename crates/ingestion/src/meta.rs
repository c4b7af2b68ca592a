//! The per-dataset `meta.json` descriptor.

use std::fs;
use std::path::Path;

use projection::{Hemisphere, UtmGrid, UtmZone};
use serde::Deserialize;
use wind_common::{WindError, WindResult};

/// Ingestion descriptor read once per dataset directory.
///
/// ```json
/// {
///   "utmHemisphere": "N",
///   "utmZone": 33,
///   "utmCorners": [[383900, 5818000], [385900, 5820000]],
///   "coordinatesRelative": false
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMeta {
    pub utm_hemisphere: String,
    pub utm_zone: i64,
    pub utm_corners: [[f64; 2]; 2],
    #[serde(default)]
    pub coordinates_relative: bool,
}

impl DatasetMeta {
    /// Read and parse `meta.json` from a dataset directory.
    ///
    /// Missing or malformed fields fail this dataset only.
    pub fn load(dataset: &str, dir: &Path) -> WindResult<Self> {
        let path = dir.join("meta.json");
        let bytes = fs::read(&path).map_err(|e| WindError::InvalidMeta {
            dataset: dataset.to_string(),
            message: format!("meta.json: {}", e),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| WindError::InvalidMeta {
            dataset: dataset.to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the descriptor and build the projected grid frame.
    pub fn to_grid(&self, dataset: &str) -> WindResult<UtmGrid> {
        let invalid = |e: WindError| WindError::InvalidMeta {
            dataset: dataset.to_string(),
            message: e.to_string(),
        };

        let hemisphere = Hemisphere::parse(&self.utm_hemisphere).map_err(invalid)?;
        let zone = UtmZone::new(self.utm_zone, hemisphere).map_err(invalid)?;
        UtmGrid::new(zone, self.utm_corners, self.coordinates_relative).map_err(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_meta(dir: &Path, contents: &str) {
        let mut f = fs::File::create(dir.join("meta.json")).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_valid_meta() {
        let dir = tempfile::tempdir().unwrap();
        write_meta(
            dir.path(),
            r#"{"utmHemisphere": "N", "utmZone": 33,
                "utmCorners": [[383900, 5818000], [385900, 5820000]]}"#,
        );

        let meta = DatasetMeta::load("demo", dir.path()).unwrap();
        assert_eq!(meta.utm_zone, 33);
        assert!(!meta.coordinates_relative);
        assert!(meta.to_grid("demo").is_ok());
    }

    #[test]
    fn test_missing_zone_is_invalid_meta() {
        let dir = tempfile::tempdir().unwrap();
        write_meta(
            dir.path(),
            r#"{"utmHemisphere": "N", "utmCorners": [[0, 0], [1, 1]]}"#,
        );

        assert!(matches!(
            DatasetMeta::load("demo", dir.path()),
            Err(WindError::InvalidMeta { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_invalid_meta() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DatasetMeta::load("demo", dir.path()),
            Err(WindError::InvalidMeta { .. })
        ));
    }

    #[test]
    fn test_bad_hemisphere_and_zone_fail_grid_validation() {
        let dir = tempfile::tempdir().unwrap();
        write_meta(
            dir.path(),
            r#"{"utmHemisphere": "Q", "utmZone": 33,
                "utmCorners": [[383900, 5818000], [385900, 5820000]]}"#,
        );
        let meta = DatasetMeta::load("demo", dir.path()).unwrap();
        assert!(matches!(
            meta.to_grid("demo"),
            Err(WindError::InvalidMeta { .. })
        ));

        write_meta(
            dir.path(),
            r#"{"utmHemisphere": "N", "utmZone": 99,
                "utmCorners": [[383900, 5818000], [385900, 5820000]]}"#,
        );
        let meta = DatasetMeta::load("demo", dir.path()).unwrap();
        assert!(meta.to_grid("demo").is_err());
    }

    #[test]
    fn test_degenerate_corners_fail_grid_validation() {
        let dir = tempfile::tempdir().unwrap();
        write_meta(
            dir.path(),
            r#"{"utmHemisphere": "N", "utmZone": 33,
                "utmCorners": [[383900, 5818000], [383900, 5820000]]}"#,
        );
        let meta = DatasetMeta::load("demo", dir.path()).unwrap();
        assert!(meta.to_grid("demo").is_err());
    }
}
