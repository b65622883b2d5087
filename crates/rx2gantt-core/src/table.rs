//! Positional-span-to-table reconstruction.
//!
//! The source PDFs carry no table markup, only positioned text fragments.
//! Reconstruction clusters spans into physical rows by rounded top
//! y-coordinate and assigns each span to a logical column by its left edge
//! against the template geometry in [`ColumnLayout`].

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::layout::ColumnLayout;
use crate::types::{BBox, TextSpan};

/// An alphanumeric code immediately followed by a `YYYY-` date prefix.
///
/// The source renderer occasionally emits the frequency code and the start
/// of the stop date as one fragment with no separator; this is the shape
/// that identifies those merged fragments.
static MERGED_FRAGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9]+)\s*([0-9]{4}-)").expect("merged-fragment pattern is valid")
});

/// One physical text line of the reconstructed table.
///
/// `cells` has exactly one slot per logical column; a slot is `None` when
/// no span landed in that column on this line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Page the row was read from (0-based).
    pub page: usize,
    /// Clustering key: the spans' top y-coordinate rounded to the nearest
    /// integer. Spans whose y0 rounds to the same value sit on the same
    /// visual line.
    pub key: i64,
    /// One optional cell string per logical column.
    pub cells: Vec<Option<String>>,
}

/// Whether `text` contains any CJK Unified Ideograph (U+4E00..=U+9FFF).
///
/// The template interleaves a translated line under each Latin line; the
/// pipeline works on the Latin half only.
#[must_use]
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Split a merged fragment into its two constituent spans.
///
/// When the text matches [`MERGED_FRAGMENT`], the span divides into the
/// code part and the date-prefix part. The bounding boxes divide at the
/// fixed layout boundary rather than the text midpoint: column assignment
/// depends on geometry, not glyph width, so the right part must start
/// inside the stop-time column regardless of how wide the code rendered.
/// Non-matching spans pass through unchanged.
#[must_use]
pub fn split_merged_span(span: TextSpan, layout: &ColumnLayout) -> Vec<TextSpan> {
    let Some(caps) = MERGED_FRAGMENT.captures(&span.text) else {
        return vec![span];
    };
    let (left_text, right_text) = (caps[1].to_string(), caps[2].to_string());
    let BBox { x0, y0, x1, y1 } = span.bbox;
    vec![
        TextSpan::new(left_text, BBox::new(x0, y0, layout.split_left_x1, y1), span.page),
        TextSpan::new(right_text, BBox::new(layout.split_right_x0, y0, x1, y1), span.page),
    ]
}

/// Cluster spans into [`RawRow`]s.
///
/// Spans are split where merged, assigned to columns by left edge, and
/// grouped by (page, rounded y0). Within a cell, text accumulates in
/// encounter order with a single space between fragments. Rows come back
/// in ascending (page, row-key) order.
///
/// Two kinds of input are dropped without error: spans whose left edge
/// falls outside every column range (boundary drift is expected), and
/// whole rows where any populated cell still contains CJK text — upstream
/// filtering should prevent the latter, but adjacent-span merging can
/// reintroduce mixed content.
#[must_use]
pub fn reconstruct_rows(spans: Vec<TextSpan>, layout: &ColumnLayout) -> Vec<RawRow> {
    let mut rows: BTreeMap<(usize, i64), Vec<Option<String>>> = BTreeMap::new();
    let mut unassigned = 0usize;

    for span in spans.into_iter().flat_map(|s| split_merged_span(s, layout)) {
        let Some(col) = layout.assign_column(span.bbox.x0) else {
            unassigned += 1;
            continue;
        };
        let key = (span.page, span.bbox.y0.round() as i64);
        let cells = rows
            .entry(key)
            .or_insert_with(|| vec![None; layout.column_count()]);
        match &mut cells[col] {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&span.text);
            }
            slot => *slot = Some(span.text),
        }
    }

    if unassigned > 0 {
        log::debug!("dropped {unassigned} spans outside all column boundaries");
    }

    let total = rows.len();
    let kept: Vec<RawRow> = rows
        .into_iter()
        .filter(|(_, cells)| {
            !cells
                .iter()
                .flatten()
                .any(|cell| contains_cjk(cell))
        })
        .map(|((page, key), cells)| RawRow { page, key, cells })
        .collect();

    if kept.len() < total {
        log::debug!("dropped {} rows containing CJK text", total - kept.len());
    }

    kept
}
