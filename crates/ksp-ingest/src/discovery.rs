//! Raw export discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// File stem shared by all raw Kickstarter exports.
pub const BATCH_STEM: &str = "Kickstarter";

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Position of a raw export in the batch sequence.
///
/// `Kickstarter.csv` is batch 0; `KickstarterNNN.csv` is batch NNN.
/// Returns `None` for files outside the naming scheme.
pub fn batch_index(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return None;
    }
    let suffix = stem.strip_prefix(BATCH_STEM)?;
    if suffix.is_empty() {
        return Some(0);
    }
    if suffix.chars().all(|c| c.is_ascii_digit()) {
        suffix.parse().ok()
    } else {
        None
    }
}

/// Discover raw export batches in a directory, in batch order.
///
/// Other CSV files in the directory are skipped with a debug log.
pub fn discover_batches(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut batches: Vec<(u32, PathBuf)> = Vec::new();
    for path in list_csv_files(dir)? {
        match batch_index(&path) {
            Some(index) => batches.push((index, path)),
            None => tracing::debug!(path = %path.display(), "skipping non-batch csv"),
        }
    }
    batches.sort_by_key(|(index, _)| *index);
    Ok(batches.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), "header\ndata").unwrap();
        }
        dir
    }

    #[test]
    fn test_list_csv_files() {
        let dir = create_test_dir(&["b.csv", "a.CSV", "notes.txt"]);
        let files = list_csv_files(dir.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.CSV"));
    }

    #[test]
    fn test_list_csv_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.csv");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_csv_files(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_batch_index() {
        assert_eq!(batch_index(Path::new("Kickstarter.csv")), Some(0));
        assert_eq!(batch_index(Path::new("Kickstarter007.csv")), Some(7));
        assert_eq!(batch_index(Path::new("Kickstarter065.csv")), Some(65));
        assert_eq!(batch_index(Path::new("Kickstarter_old.csv")), None);
        assert_eq!(batch_index(Path::new("data.csv")), None);
        assert_eq!(batch_index(Path::new("Kickstarter001.json")), None);
    }

    #[test]
    fn test_discover_batches_in_numeric_order() {
        let dir = create_test_dir(&[
            "Kickstarter010.csv",
            "Kickstarter002.csv",
            "Kickstarter.csv",
            "data.csv",
        ]);
        let batches = discover_batches(dir.path()).unwrap();
        let names: Vec<_> = batches
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Kickstarter.csv", "Kickstarter002.csv", "Kickstarter010.csv"]
        );
    }
}
