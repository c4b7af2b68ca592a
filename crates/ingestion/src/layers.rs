//! Raw sample file discovery and parsing.
//!
//! A raw file carries one sample per line as whitespace-separated
//! `x y z u v w`: a projected grid coordinate, altitude, and the three
//! wind velocity components. One raw file is one layer, named by its file
//! stem.

use std::fs;
use std::path::{Path, PathBuf};

use wind_common::{WindError, WindResult};

/// One parsed raw-file row, still in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRow {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

/// Raw sample files in a dataset directory, sorted by file name.
///
/// Any regular file other than `meta.json` counts; the format is
/// extension-agnostic. Hidden files are ignored.
pub fn discover_raw_files(dir: &Path) -> WindResult<Vec<PathBuf>> {
    let mut files: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .map(|n| n != "meta.json" && !n.to_string_lossy().starts_with('.'))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Layer name for a raw file: the file stem.
pub fn layer_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Parse a raw sample file.
///
/// Blank lines are ignored; any other malformed row fails the dataset.
pub fn parse_raw_file(path: &Path) -> WindResult<Vec<RawRow>> {
    let file_label = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let contents = fs::read_to_string(path)?;
    let mut rows = Vec::new();

    for (line_idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(WindError::MalformedRow {
                file: file_label,
                line: line_idx + 1,
                message: format!("expected 6 fields, got {}", fields.len()),
            });
        }

        let mut parsed = [0.0f64; 6];
        for (slot, field) in parsed.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| WindError::MalformedRow {
                file: file_label.clone(),
                line: line_idx + 1,
                message: format!("not a number: {}", field),
            })?;
        }

        let [x, y, z, u, v, w] = parsed;
        rows.push(RawRow { x, y, z, u, v, w });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "wind-80m.xy",
            "383900 5818000 80 1.5 -2.0 0.25\n\n384000 5818100 80 1.6 -2.1 0.20\n",
        );

        let rows = parse_raw_file(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            RawRow {
                x: 383_900.0,
                y: 5_818_000.0,
                z: 80.0,
                u: 1.5,
                v: -2.0,
                w: 0.25
            }
        );
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let short = write_file(dir.path(), "short.xy", "1 2 3 4 5\n");
        assert!(matches!(
            parse_raw_file(&short),
            Err(WindError::MalformedRow { line: 1, .. })
        ));

        let garbled = write_file(dir.path(), "garbled.xy", "1 2 3 4 5 6\n1 2 three 4 5 6\n");
        assert!(matches!(
            parse_raw_file(&garbled),
            Err(WindError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_discovery_skips_meta_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "b-layer.xy", "");
        write_file(dir.path(), "meta.json", "{}");
        write_file(dir.path(), "a-layer.dat", "");

        let files = discover_raw_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| layer_name(p)).collect();
        assert_eq!(names, vec!["a-layer", "b-layer"]);
    }
}
