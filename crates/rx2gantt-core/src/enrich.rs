//! Classification enrichment seam.
//!
//! Enrichment is an optional side-channel applied to normalized records
//! before rendering. The collaborator behind [`Classify`] is network-facing
//! (see `rx2gantt-rxnav`); this module only defines the seam and the
//! fan-out so the pipeline itself stays free of I/O.

use std::collections::HashMap;

use crate::types::{Classification, MedicationRecord};

/// A pharmacologic classification source.
///
/// Implementations must degrade, not fail: a lookup that errors or finds
/// nothing returns the all-empty [`Classification`]. Lookups may run
/// concurrently across documents, so implementations hold no cross-call
/// mutable state.
pub trait Classify: Sync {
    /// Classify one generic drug name.
    fn classify(&self, generic_name: &str) -> Classification;
}

/// Classifier used when the collaborator is absent or the run is offline.
/// Every lookup yields the all-empty classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClassifier;

impl Classify for NoopClassifier {
    fn classify(&self, _generic_name: &str) -> Classification {
        Classification::default()
    }
}

/// Append classification fields to every record.
///
/// Each distinct generic name is resolved exactly once per call and the
/// result fans out to all records sharing it. DDI/SE are reserved for
/// collaborators outside this core and stay untouched.
pub fn enrich_records(records: &mut [MedicationRecord], classifier: &dyn Classify) {
    let mut memo: HashMap<String, Classification> = HashMap::new();

    for record in records.iter_mut() {
        let classification = memo
            .entry(record.generic_name.clone())
            .or_insert_with(|| classifier.classify(&record.generic_name));
        record.moa = classification.moa.clone();
        record.epc = classification.epc.clone();
        record.pe = classification.pe.clone();
    }
}
