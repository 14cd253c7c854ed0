/// Startup directory scan
///
/// Lists the input folder (non-recursive, PNG only), orders it naturally,
/// and filters out every image already represented in the output folder —
/// in original or zoomed form — so re-running the tool is idempotent.
/// The pending queue is computed once at startup, never re-checked mid-run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::naming::{natural_key, strip_variant_suffix};

/// A single image waiting to be processed. Immutable once enumerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    /// Full path to the source PNG
    pub path: PathBuf,
    /// Filename only (e.g., "photo_012.png")
    pub file_name: String,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("input directory {0} does not exist or is not a directory")]
    MissingInputDir(PathBuf),
}

/// List the PNG files directly inside a directory.
///
/// A missing directory yields an empty list: the output folder legitimately
/// does not exist before the first run.
fn list_pngs(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}

/// Compute the ordered queue of images still to be processed.
///
/// The processed set is the suffix-stripped basenames of everything in the
/// output folder, so both `photo.png` and `photo_1.5x.png` mark `photo.png`
/// as done.
pub fn compute_pending_queue(input_dir: &Path, output_dir: &Path) -> Result<Vec<ImageTask>, ScanError> {
    if !input_dir.is_dir() {
        return Err(ScanError::MissingInputDir(input_dir.to_path_buf()));
    }

    let processed: HashSet<String> = list_pngs(output_dir)
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .map(strip_variant_suffix)
        .collect();

    let mut inputs = list_pngs(input_dir);
    inputs.sort_by_cached_key(|p| {
        p.file_name()
            .map(|n| natural_key(&n.to_string_lossy()))
            .unwrap_or_default()
    });

    let mut pending = Vec::new();
    for path in inputs {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            eprintln!("⚠️  Skipping non-UTF-8 filename: {}", path.display());
            continue;
        };

        if processed.contains(file_name) {
            println!("⏭️  Skipping {} (already has a saved variant)", file_name);
            continue;
        }

        pending.push(ImageTask {
            file_name: file_name.to_string(),
            path,
        });
    }

    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_queue_is_naturally_ordered() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["img10.png", "img2.png", "a.png", "note.txt"] {
            touch(input.path(), name);
        }

        let queue = compute_pending_queue(input.path(), output.path()).unwrap();
        let names: Vec<&str> = queue.iter().map(|t| t.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "img2.png", "img10.png"]);
    }

    #[test]
    fn test_processed_images_are_excluded() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            touch(input.path(), name);
        }
        // a saved verbatim, b saved as a zoomed variant
        touch(output.path(), "a.png");
        touch(output.path(), "b_1.5x.png");

        let queue = compute_pending_queue(input.path(), output.path()).unwrap();
        let names: Vec<&str> = queue.iter().map(|t| t.file_name.as_str()).collect();
        assert_eq!(names, vec!["c.png"]);
    }

    #[test]
    fn test_missing_output_dir_means_nothing_processed() {
        let input = tempfile::tempdir().unwrap();
        touch(input.path(), "a.png");

        let queue =
            compute_pending_queue(input.path(), Path::new("/nonexistent/output")).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_missing_input_dir_is_an_error() {
        let output = tempfile::tempdir().unwrap();
        let result = compute_pending_queue(Path::new("/nonexistent/input"), output.path());
        assert!(result.is_err());
    }
}
