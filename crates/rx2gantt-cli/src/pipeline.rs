//! Per-document pipeline: extract → reconstruct → normalize → enrich →
//! export.
//!
//! Each document runs independently and touches only its own output
//! paths, so a batch may fan documents out across worker threads; the only
//! shared resource is the classifier, which is stateless per lookup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use rx2gantt_chart::{render_gantt, ChartError, RenderOptions};
use rx2gantt_core::{enrich_records, fold_records, reconstruct_rows, Classify, ColumnLayout};
use rx2gantt_pdf::extract_spans;

use crate::paths::{derive_output_paths, ensure_output_dir};
use crate::summary::write_summary;

/// Which artifacts one run produces.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Render the Gantt timeline PNG.
    pub chart: bool,
    /// Export the classification summary CSV.
    pub summary: bool,
    /// Attempt classification enrichment.
    pub classify: bool,
    /// Document template geometry.
    pub layout: ColumnLayout,
    /// Chart rendering options.
    pub render: RenderOptions,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            chart: true,
            summary: true,
            classify: true,
            layout: ColumnLayout::default(),
            render: RenderOptions::default(),
        }
    }
}

/// What one document's run produced.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Source document.
    pub input: PathBuf,
    /// Count of validated records.
    pub records: usize,
    /// Summary CSV path, when exported.
    pub summary_csv: Option<PathBuf>,
    /// Gantt PNG path, when rendered.
    pub gantt_png: Option<PathBuf>,
    /// The document yielded zero valid records; the summary (if enabled)
    /// is header-only and no chart was rendered.
    pub nothing_to_render: bool,
}

/// Run the full pipeline for one document.
///
/// A document with zero valid records is not a failure: the summary still
/// exports (header-only) and the outcome reports the nothing-to-render
/// condition instead of producing a malformed image.
///
/// # Errors
///
/// Fails when the document cannot be read, an output directory or file
/// cannot be written, or rendering fails for a non-empty record set. The
/// error names the source path and stage; the batch driver reports it and
/// moves on to sibling documents.
pub fn process_document(
    input: &Path,
    options: &ProcessOptions,
    classifier: &dyn Classify,
) -> Result<ProcessOutcome> {
    let spans = extract_spans(input)
        .with_context(|| format!("extraction failed for {}", input.display()))?;
    let rows = reconstruct_rows(spans, &options.layout);
    let mut records = fold_records(&rows, &options.layout);
    log::info!(
        "{}: {} rows reconstructed, {} records validated",
        input.display(),
        rows.len(),
        records.len()
    );

    if options.classify && !records.is_empty() {
        enrich_records(&mut records, classifier);
    }

    let artifact_paths = derive_output_paths(input);
    let mut outcome = ProcessOutcome {
        input: input.to_path_buf(),
        records: records.len(),
        summary_csv: None,
        gantt_png: None,
        nothing_to_render: records.is_empty(),
    };

    if options.summary {
        ensure_output_dir(&artifact_paths.summary_csv)?;
        write_summary(&records, &artifact_paths.summary_csv)
            .with_context(|| format!("summary export failed for {}", input.display()))?;
        outcome.summary_csv = Some(artifact_paths.summary_csv);
    }

    if options.chart {
        match render_chart(&records, options, &artifact_paths.gantt_png) {
            Ok(true) => outcome.gantt_png = Some(artifact_paths.gantt_png),
            Ok(false) => {} // nothing to render, already flagged
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("render failed for {}", input.display()));
            }
        }
    }

    Ok(outcome)
}

/// Render the chart; an empty record set reports back as `Ok(false)`
/// rather than an error, every other render failure propagates.
fn render_chart(
    records: &[rx2gantt_core::MedicationRecord],
    options: &ProcessOptions,
    path: &Path,
) -> Result<bool> {
    if records.is_empty() {
        return Ok(false);
    }
    ensure_output_dir(path)?;
    match render_gantt(records, &options.render, path) {
        Ok(()) => Ok(true),
        Err(ChartError::NoRecords) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_enable_everything() {
        let options = ProcessOptions::default();
        assert!(options.chart && options.summary && options.classify);
        assert_eq!(options.layout.wrap_rows, 3);
    }

    #[test]
    fn empty_record_set_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("gantt").join("orders_gantt.png");
        let options = ProcessOptions::default();
        let rendered = render_chart(&[], &options, &out).unwrap();
        assert!(!rendered);
        assert!(!out.exists(), "no chart file for an empty record set");
    }
}
