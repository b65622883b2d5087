//! Medication-order table geometry.
//!
//! The source documents are generated from one fixed template, so the
//! logical columns live at known x-ranges. Everything template-specific is
//! a field of [`ColumnLayout`]; the `Default` impl carries the measured
//! values for the current template.

/// Logical column indices for the default medication-order template.
///
/// Kept as plain indices rather than an enum because [`ColumnLayout`]
/// supports templates with a different column count.
pub mod column {
    /// Order issue time.
    pub const ISSUE_TIME: usize = 0;
    /// Generic name with `<<brand name>>` suffix.
    pub const NAME: usize = 1;
    /// Dose.
    pub const DOSE: usize = 2;
    /// Administration route.
    pub const ROUTE: usize = 3;
    /// Administration frequency.
    pub const FREQUENCY: usize = 4;
    /// Order stop time.
    pub const STOP_TIME: usize = 5;
    /// Total quantity dispensed.
    pub const TOTAL: usize = 6;
}

/// Geometry of one document template.
///
/// `boundaries` is an ordered, non-overlapping list of half-open
/// `[start, end)` x-ranges, one per logical column. A span whose left edge
/// falls outside every range is unassignable and silently dropped;
/// boundary drift in the source renderer is expected and tolerated.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// Half-open `[start, end)` x-ranges, sorted ascending and disjoint.
    pub boundaries: Vec<(f32, f32)>,
    /// Right edge given to the left part of a split merged span.
    pub split_left_x1: f32,
    /// Left edge given to the right part of a split merged span.
    pub split_right_x0: f32,
    /// Physical text rows per logical record (the template wraps each
    /// order entry across this many lines).
    pub wrap_rows: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            boundaries: vec![
                (24.0, 54.0),   // issue time
                (62.0, 255.0),  // generic<<brand>> name
                (269.0, 316.0), // dose
                (324.0, 343.0), // route
                (347.0, 393.0), // frequency
                (393.0, 424.0), // stop time
                (434.0, 444.0), // total quantity
            ],
            split_left_x1: 392.0,
            split_right_x0: 393.0,
            wrap_rows: 3,
        }
    }
}

impl ColumnLayout {
    /// Number of logical columns in this template.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Column index for a span whose left edge is `x0`, or `None` when the
    /// coordinate falls outside every range.
    #[must_use]
    pub fn assign_column(&self, x0: f32) -> Option<usize> {
        self.boundaries
            .iter()
            .position(|&(start, end)| x0 >= start && x0 < end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_has_seven_columns() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.column_count(), 7);
    }

    #[test]
    fn default_boundaries_are_sorted_and_disjoint() {
        let layout = ColumnLayout::default();
        for pair in layout.boundaries.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "ranges overlap: {pair:?}");
        }
        for &(start, end) in &layout.boundaries {
            assert!(start < end);
        }
    }

    #[test]
    fn assign_column_inside_exactly_one_range() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.assign_column(30.0), Some(column::ISSUE_TIME));
        assert_eq!(layout.assign_column(100.0), Some(column::NAME));
        assert_eq!(layout.assign_column(437.0), Some(column::TOTAL));
    }

    #[test]
    fn assign_column_range_start_is_inclusive_end_exclusive() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.assign_column(24.0), Some(column::ISSUE_TIME));
        assert_eq!(layout.assign_column(54.0), None); // gap between columns
        assert_eq!(layout.assign_column(393.0), Some(column::STOP_TIME));
    }

    #[test]
    fn assign_column_outside_all_ranges_is_none() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.assign_column(0.0), None);
        assert_eq!(layout.assign_column(500.0), None);
        assert_eq!(layout.assign_column(58.0), None);
    }
}
