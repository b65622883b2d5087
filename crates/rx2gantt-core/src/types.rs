//! Plain value types shared across the rx2gantt pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in top-down page coordinates.
///
/// `y0` is the top edge and grows downward, matching the coordinate space
/// the medication-order template geometry was measured in. The PDF
/// extractor converts from pdfium's bottom-up space before constructing
/// spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge in page points.
    pub x0: f32,
    /// Top edge in page points.
    pub y0: f32,
    /// Right edge in page points.
    pub x1: f32,
    /// Bottom edge in page points.
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from edge coordinates.
    #[must_use]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// A single positioned text fragment extracted from a document page.
///
/// Spans reaching this crate are already trimmed, non-empty, and free of
/// CJK Unified Ideographs (the template interleaves a translated line the
/// pipeline discards at the source). They are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Fragment text, whitespace-trimmed.
    pub text: String,
    /// Position on the page, top-down coordinates.
    pub bbox: BBox,
    /// Page index (0-based).
    pub page: usize,
}

impl TextSpan {
    /// Create a span from its parts.
    #[must_use]
    pub fn new(text: impl Into<String>, bbox: BBox, page: usize) -> Self {
        Self {
            text: text.into(),
            bbox,
            page,
        }
    }
}

/// Pharmacologic classification for one generic drug name.
///
/// Each field is a newline-joined, lexicographically sorted, deduplicated
/// set of category names. Absent or failed lookups leave all fields empty;
/// an empty classification is always a valid value, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Mechanism of action.
    pub moa: String,
    /// Established pharmacologic class.
    pub epc: String,
    /// Physiologic effect.
    pub pe: String,
}

/// One validated medication order, assembled from three physical text rows.
///
/// The seven `*_text` / raw fields keep the column strings exactly as they
/// were folded from the page; `generic_name`, `start`, and `stop` are
/// derived once during normalization and never recomputed. Enrichment
/// fields default to empty and are only appended after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    /// Raw issue-time column text (date and time concatenated by the fold).
    pub issue_text: String,
    /// Raw name column text, typically `generic<<brand>>`.
    pub name_text: String,
    /// Dose column text.
    pub dose: String,
    /// Administration route column text.
    pub route: String,
    /// Frequency column text.
    pub frequency: String,
    /// Raw stop-time column text.
    pub stop_text: String,
    /// Total-quantity column text, Latin letters stripped.
    pub total: String,
    /// Cleaned generic drug name, the canonical subject identity.
    pub generic_name: String,
    /// Parsed issue time.
    pub start: NaiveDateTime,
    /// Parsed stop time.
    pub stop: NaiveDateTime,
    /// Mechanism of action (enrichment, default empty).
    pub moa: String,
    /// Established pharmacologic class (enrichment, default empty).
    pub epc: String,
    /// Physiologic effect (enrichment, default empty).
    pub pe: String,
    /// Drug-drug interactions (reserved, always empty in this core).
    pub ddi: String,
    /// Side effects (reserved, always empty in this core).
    pub se: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_new_sets_edges() {
        let b = BBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(b.x0, 1.0);
        assert_eq!(b.y0, 2.0);
        assert_eq!(b.x1, 3.0);
        assert_eq!(b.y1, 4.0);
    }

    #[test]
    fn classification_default_is_all_empty() {
        let c = Classification::default();
        assert!(c.moa.is_empty() && c.epc.is_empty() && c.pe.is_empty());
    }
}
