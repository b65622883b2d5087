//! Input document discovery.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Resolve the input path to the list of documents to process.
///
/// A file path selects that single document; a directory selects every
/// file directly inside it with a `.pdf` extension, case-insensitively
/// and non-recursively, in name order for a stable batch sequence.
///
/// # Errors
///
/// Fails when the path does not exist or the directory cannot be read.
/// An empty directory is not an error here; the caller decides how to
/// report an empty batch.
pub fn discover_documents(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("input path does not exist: {}", input.display());
    }

    let entries = std::fs::read_dir(input)
        .with_context(|| format!("failed to read input folder {}", input.display()))?;

    let mut documents: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();
    documents.sort();
    Ok(documents)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
