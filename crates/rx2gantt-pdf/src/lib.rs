//! Positioned text span extraction for rx2gantt.
//!
//! Uses `pdfium-render` (Chromium's PDF library) to pull raw positioned
//! text fragments out of each page of a medication-order PDF. This is the
//! only stage that touches the document; everything downstream
//! (`rx2gantt-core`) operates on plain [`TextSpan`] values.
//!
//! pdfium reports page coordinates bottom-up; spans are converted to the
//! top-down space the template geometry was measured in before they leave
//! this crate.
//!
//! Requires the pdfium dynamic library to be present at runtime.

use std::path::Path;

use pdfium_render::prelude::*;
use thiserror::Error;

use rx2gantt_core::{contains_cjk, BBox, TextSpan};

/// Errors from reading a source document.
///
/// Any failure here is fatal for the whole document: no partial span list
/// is ever returned. The batch driver catches these per file.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The document could not be opened or is not a readable PDF.
    #[error("failed to open {path}: {message}")]
    Open {
        /// Source document path.
        path: String,
        /// Underlying pdfium error.
        message: String,
    },

    /// A page could not be decoded.
    #[error("failed to decode page {page} of {path}: {message}")]
    Page {
        /// Source document path.
        path: String,
        /// Page index (0-based).
        page: usize,
        /// Underlying pdfium error.
        message: String,
    },
}

/// Extract all usable text spans from a document, in page order.
///
/// A span is usable when it is non-empty after trimming and contains no
/// CJK Unified Ideographs (the template interleaves a translated line the
/// pipeline discards at the source). Extraction is a pure read: the
/// document is never modified.
///
/// # Errors
///
/// Returns [`PdfError`] when the document cannot be opened or any page
/// cannot be decoded; no partial results are returned for that document.
#[allow(deprecated)] // PdfRect field access deprecated in 0.8.28, removed in 0.9.0
pub fn extract_spans(path: &Path) -> Result<Vec<TextSpan>, PdfError> {
    let pdfium = Pdfium::default();
    let display_path = path.display().to_string();

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| PdfError::Open {
            path: display_path.clone(),
            message: e.to_string(),
        })?;

    let mut spans = Vec::new();
    for (page_idx, page) in document.pages().iter().enumerate() {
        let page_height = page.height().value;
        let text = page.text().map_err(|e| PdfError::Page {
            path: display_path.clone(),
            page: page_idx,
            message: e.to_string(),
        })?;

        for segment in text.segments().iter() {
            let rect = segment.bounds();
            if let Some(span) = make_span(
                &segment.text(),
                rect.left.value,
                rect.top.value,
                rect.right.value,
                rect.bottom.value,
                page_height,
                page_idx,
            ) {
                spans.push(span);
            }
        }
    }

    log::debug!("extracted {} spans from {display_path}", spans.len());
    Ok(spans)
}

/// Build a usable span from one raw pdfium segment, or `None` when the
/// segment is empty after trimming or contains CJK text.
///
/// `top` and `bottom` are in pdfium's bottom-up space (`top > bottom`);
/// the resulting span is in top-down coordinates.
fn make_span(
    raw_text: &str,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    page_height: f32,
    page: usize,
) -> Option<TextSpan> {
    let text = raw_text.trim();
    if text.is_empty() || contains_cjk(text) {
        return None;
    }
    Some(TextSpan::new(
        text,
        BBox::new(left, page_height - top, right, page_height - bottom),
        page,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_span_converts_to_top_down_coordinates() {
        // Page is 842pt tall; segment sits 800..790 above the bottom edge.
        let span = make_span("09:30", 24.0, 800.0, 54.0, 790.0, 842.0, 0).expect("usable span");
        assert_eq!(span.bbox, BBox::new(24.0, 42.0, 54.0, 52.0));
        assert!(span.bbox.y0 < span.bbox.y1, "y grows downward");
        assert_eq!(span.page, 0);
    }

    #[test]
    fn make_span_trims_whitespace() {
        let span = make_span("  Metformin  ", 62.0, 800.0, 255.0, 790.0, 842.0, 0).unwrap();
        assert_eq!(span.text, "Metformin");
    }

    #[test]
    fn make_span_drops_empty_segments() {
        assert!(make_span("   ", 62.0, 800.0, 255.0, 790.0, 842.0, 0).is_none());
        assert!(make_span("", 62.0, 800.0, 255.0, 790.0, 842.0, 0).is_none());
    }

    #[test]
    fn make_span_drops_cjk_segments() {
        assert!(make_span("每日一次", 62.0, 800.0, 255.0, 790.0, 842.0, 0).is_none());
        assert!(make_span("Aspirin 錠", 62.0, 800.0, 255.0, 790.0, 842.0, 0).is_none());
    }

    #[test]
    fn open_error_mentions_path_and_stage() {
        let err = PdfError::Open {
            path: "orders.pdf".into(),
            message: "file not found".into(),
        };
        let display = err.to_string();
        assert!(display.contains("orders.pdf"));
        assert!(display.contains("open"));
    }
}
