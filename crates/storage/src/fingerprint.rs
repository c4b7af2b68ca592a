//! Content fingerprints for idempotent re-ingestion.

use std::fs;
use std::path::Path;

use crc32fast::Hasher;
use wind_common::WindResult;

/// CRC32 over a source dataset directory: the `meta.json` bytes plus every
/// raw file's name and bytes, in sorted file order. Hidden files are
/// ignored, matching raw-file discovery.
///
/// Any one-byte change in the descriptor or a raw file changes the
/// fingerprint; an unchanged directory always reproduces it.
pub fn dataset_fingerprint(dataset_dir: &Path) -> WindResult<u32> {
    let mut hasher = Hasher::new();

    let meta = fs::read(dataset_dir.join("meta.json"))?;
    hasher.update(&meta);

    let mut raw_files: Vec<_> = fs::read_dir(dataset_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|n| n != "meta.json" && !n.to_string_lossy().starts_with('.'))
                .unwrap_or(false)
        })
        .collect();
    raw_files.sort();

    for path in raw_files {
        if let Some(name) = path.file_name() {
            hasher.update(name.to_string_lossy().as_bytes());
        }
        hasher.update(&fs::read(&path)?);
    }

    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "meta.json", r#"{"utmZone": 33}"#);
        write_file(dir.path(), "layer-a.xy", "0 0 80 1.0 2.0 0.1\n");

        let a = dataset_fingerprint(dir.path()).unwrap();
        let b = dataset_fingerprint(dir.path()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_changes_with_one_byte() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "meta.json", r#"{"utmZone": 33}"#);
        write_file(dir.path(), "layer-a.xy", "0 0 80 1.0 2.0 0.1\n");
        let before = dataset_fingerprint(dir.path()).unwrap();

        write_file(dir.path(), "layer-a.xy", "0 0 80 1.0 2.0 0.2\n");
        let after = dataset_fingerprint(dir.path()).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_fingerprint_covers_file_names() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "meta.json", r#"{"utmZone": 33}"#);
        write_file(dir.path(), "layer-a.xy", "0 0 80 1.0 2.0 0.1\n");
        let before = dataset_fingerprint(dir.path()).unwrap();

        fs::rename(dir.path().join("layer-a.xy"), dir.path().join("layer-b.xy")).unwrap();
        let after = dataset_fingerprint(dir.path()).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_fingerprint_requires_meta() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "layer-a.xy", "0 0 80 1.0 2.0 0.1\n");
        assert!(dataset_fingerprint(dir.path()).is_err());
    }
}
