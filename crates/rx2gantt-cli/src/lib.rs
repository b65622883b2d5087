//! Batch driver internals for the rx2gantt CLI.
//!
//! The binary in `main.rs` handles argument parsing and reporting; the
//! reusable pieces live here: document discovery, output path derivation,
//! the per-document pipeline, and the CSV summary writer.

pub mod discover;
pub mod paths;
pub mod pipeline;
pub mod summary;
