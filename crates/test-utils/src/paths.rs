//! Locating reference data and scratch databases for tests.

use std::path::PathBuf;

use tempfile::TempDir;

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or(manifest_dir)
}

/// Find an optional reference file such as `Challenge2.csv`.
///
/// Checked in order: `$TEST_DATA_DIR`, `data/` (the ingester's default
/// location), `crates/ingestion/testdata/`, `testdata/`.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let root = workspace_root();
    std::env::var("TEST_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .into_iter()
        .chain([
            root.join("data"),
            root.join("crates").join("ingestion").join("testdata"),
            root.join("testdata"),
        ])
        .map(|dir| dir.join(name))
        .find(|path| path.exists())
}

/// Scratch directory plus a database path inside it that does not exist yet.
///
/// Keep the `TempDir` alive for as long as the database is in use.
pub fn temp_db() -> (TempDir, PathBuf) {
    let dir = tempfile::Builder::new()
        .prefix("depthframe_")
        .tempdir()
        .expect("create temporary directory");
    let path = dir.path().join("image_store.db");
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn test_missing_file_is_none() {
        assert_eq!(find_test_file("no_such_file_7f3a.csv"), None);
    }

    #[test]
    fn test_temp_db_path_is_fresh() {
        let (dir, path) = temp_db();
        assert!(path.starts_with(dir.path()));
        assert!(!path.exists());
    }
}
