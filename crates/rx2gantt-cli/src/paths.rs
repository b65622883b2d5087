//! Output artifact locations.
//!
//! Each input document gets two sibling output directories next to it:
//! `summary/` for the tabular CSV and `gantt/` for the rendered timeline,
//! both created on demand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Where one document's artifacts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<input dir>/summary/<basename>_summary.csv`
    pub summary_csv: PathBuf,
    /// `<input dir>/gantt/<basename>_gantt.png`
    pub gantt_png: PathBuf,
}

/// Derive the artifact paths for a document without touching the
/// filesystem.
#[must_use]
pub fn derive_output_paths(document: &Path) -> OutputPaths {
    let parent = document.parent().unwrap_or_else(|| Path::new("."));
    let base = document
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    OutputPaths {
        summary_csv: parent.join("summary").join(format!("{base}_summary.csv")),
        gantt_png: parent.join("gantt").join(format!("{base}_gantt.png")),
    }
}

/// Create the directory holding `artifact`, if it is not there yet.
///
/// # Errors
///
/// Fails when the directory cannot be created.
pub fn ensure_output_dir(artifact: &Path) -> Result<()> {
    if let Some(dir) = artifact.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_land_in_sibling_directories() {
        let paths = derive_output_paths(Path::new("/data/ward7/orders.pdf"));
        assert_eq!(
            paths.summary_csv,
            Path::new("/data/ward7/summary/orders_summary.csv")
        );
        assert_eq!(paths.gantt_png, Path::new("/data/ward7/gantt/orders_gantt.png"));
    }

    #[test]
    fn basename_survives_dots_in_directory_names() {
        let paths = derive_output_paths(Path::new("/data/v1.2/scan.pdf"));
        assert_eq!(paths.gantt_png, Path::new("/data/v1.2/gantt/scan_gantt.png"));
    }

    #[test]
    fn ensure_output_dir_creates_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("summary").join("orders_summary.csv");
        ensure_output_dir(&artifact).unwrap();
        assert!(artifact.parent().unwrap().is_dir());
        // Idempotent.
        ensure_output_dir(&artifact).unwrap();
    }
}
