//! Tabular classification summary export.

use std::path::Path;

use anyhow::{Context, Result};

use rx2gantt_core::MedicationRecord;

/// Summary column order. DDI and SE are reserved for collaborators outside
/// this core and always export empty.
const HEADER: [&str; 6] = ["generic_name", "EPC", "MOA", "PE", "DDI", "SE"];

/// Write the per-record classification summary as CSV.
///
/// An empty record set still produces a valid file with the header row, so
/// a document whose rows all failed validation exports an empty-but-valid
/// summary rather than nothing.
///
/// # Errors
///
/// Fails when the file cannot be created or written.
pub fn write_summary(records: &[MedicationRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create summary {}", path.display()))?;

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([
            record.generic_name.as_str(),
            record.epc.as_str(),
            record.moa.as_str(),
            record.pe.as_str(),
            record.ddi.as_str(),
            record.se.as_str(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write summary {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(name: &str, epc: &str) -> MedicationRecord {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        MedicationRecord {
            issue_text: String::new(),
            name_text: String::new(),
            dose: "100mg".into(),
            route: "PO".into(),
            frequency: "QD".into(),
            stop_text: String::new(),
            total: "1".into(),
            generic_name: name.into(),
            start,
            stop: start + chrono::Duration::days(1),
            moa: "Cyclooxygenase Inhibitors".into(),
            epc: epc.into(),
            pe: String::new(),
            ddi: String::new(),
            se: String::new(),
        }
    }

    #[test]
    fn summary_has_fixed_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders_summary.csv");
        write_summary(&[record("Aspirin", "Nonsteroidal Anti-inflammatory Drug")], &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("generic_name,EPC,MOA,PE,DDI,SE"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("Aspirin,Nonsteroidal Anti-inflammatory Drug"));
        assert!(row.ends_with(",,"), "DDI and SE stay empty");
    }

    #[test]
    fn empty_record_set_writes_header_only_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty_summary.csv");
        write_summary(&[], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "generic_name,EPC,MOA,PE,DDI,SE");
    }

    #[test]
    fn multiline_classification_values_stay_in_one_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders_summary.csv");
        let mut rec = record("Aspirin", "EPC");
        rec.moa = "A\nB".into();
        write_summary(&[rec], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[2], "A\nB");
    }
}
