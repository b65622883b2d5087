//! Core data model and transformations for rx2gantt
//!
//! rx2gantt reconstructs a structured medication timeline from hospital
//! medication-order PDFs that contain no table markup, only positioned text
//! fragments. This crate holds the pure, I/O-free middle of that pipeline:
//!
//! ```text
//! TextSpan (positioned fragments)
//!     │  table::reconstruct_rows — column assignment + row clustering
//!     ▼
//! RawRow (one physical text line, one cell slot per column)
//!     │  records::fold_records — 3-line wrap folding + validation
//!     ▼
//! MedicationRecord (one validated medication order)
//! ```
//!
//! Span extraction lives in `rx2gantt-pdf`, chart rendering in
//! `rx2gantt-chart`, and the RxNav classification client in
//! `rx2gantt-rxnav`. Everything here operates on plain values so it can be
//! exercised with synthetic spans in tests.
//!
//! The medication-order template geometry (column x-ranges, the merged-span
//! split boundary, and the 3-row wrap factor) is carried by [`ColumnLayout`]
//! rather than baked-in constants, so a new document template is a new
//! layout value, not a code change.

pub mod enrich;
pub mod layout;
pub mod records;
pub mod table;
pub mod types;

pub use enrich::{enrich_records, Classify, NoopClassifier};
pub use layout::{column, ColumnLayout};
pub use records::fold_records;
pub use table::{contains_cjk, reconstruct_rows, split_merged_span, RawRow};
pub use types::{BBox, Classification, MedicationRecord, TextSpan};
