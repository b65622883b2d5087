//! Multi-line record assembly and validation.
//!
//! The template wraps each medication order across `wrap_rows` physical
//! text lines (three in the current template). Folding concatenates the
//! wrapped lines back into one logical record per column, then parses and
//! validates the temporal fields.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::layout::{column, ColumnLayout};
use crate::table::RawRow;
use crate::types::MedicationRecord;

/// Issue/stop timestamps as the row fold produces them: the date line and
/// the time line concatenate with no separator, so the string boundary
/// itself demarcates date from time.
const ORDER_TIME_FORMAT: &str = "%Y-%m-%d%H:%M";

/// Leading run of characters a generic drug name may contain.
static NAME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s\-().]*").expect("name-prefix pattern is valid"));

/// Parse an issue/stop column value.
///
/// Returns `None` for anything that does not match [`ORDER_TIME_FORMAT`]
/// exactly; ambiguous strings such as `2023-0110:00` (a malformed
/// `2023-01` date glued to a time) are rejected rather than guessed at.
#[must_use]
pub fn parse_order_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, ORDER_TIME_FORMAT).ok()
}

/// Derive the canonical generic name from the raw name column.
///
/// The column typically holds `generic-name<<brand-name>>`; the generic
/// name is the substring before the first `<<`, reduced to its leading run
/// of Latin letters, whitespace, hyphens, parentheses, and periods. When
/// that run is empty (a name with no Latin prefix at all), the
/// pre-delimiter substring is kept verbatim.
#[must_use]
pub fn clean_drug_name(name_text: &str) -> String {
    let head = name_text.split("<<").next().unwrap_or(name_text);
    let prefix = NAME_PREFIX
        .find(head)
        .map(|m| m.as_str().trim())
        .unwrap_or("");
    if prefix.is_empty() {
        head.trim().to_string()
    } else {
        prefix.to_string()
    }
}

/// Strip the alphabetic noise the source renderer bakes into the
/// total-quantity column, then trim.
#[must_use]
fn strip_latin_letters(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_ascii_alphabetic())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Concatenate the non-empty cells of one column across a row group.
///
/// No separator is inserted: the wrapped lines are fragments of one value
/// (most importantly, a date line followed by a time line).
fn fold_column(group: &[RawRow], col: usize) -> String {
    group
        .iter()
        .filter_map(|row| row.cells.get(col))
        .flatten()
        .map(String::as_str)
        .collect()
}

/// Fold physical rows into validated [`MedicationRecord`]s.
///
/// Rows are consumed in fixed-size groups of `layout.wrap_rows`; a trailing
/// partial group is still folded (missing cells become empty strings) and
/// validated like any other record. A record survives only if both the
/// issue time and the stop time parse; everything else is dropped, never
/// repaired. Drop counts are debug-logged, not surfaced as errors.
#[must_use]
pub fn fold_records(rows: &[RawRow], layout: &ColumnLayout) -> Vec<MedicationRecord> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for group in rows.chunks(layout.wrap_rows.max(1)) {
        let issue_text = fold_column(group, column::ISSUE_TIME);
        let stop_text = fold_column(group, column::STOP_TIME);

        let (Some(start), Some(stop)) =
            (parse_order_time(&issue_text), parse_order_time(&stop_text))
        else {
            dropped += 1;
            continue;
        };

        let name_text = fold_column(group, column::NAME);
        records.push(MedicationRecord {
            generic_name: clean_drug_name(&name_text),
            issue_text,
            name_text,
            dose: fold_column(group, column::DOSE),
            route: fold_column(group, column::ROUTE),
            frequency: fold_column(group, column::FREQUENCY),
            stop_text,
            total: strip_latin_letters(&fold_column(group, column::TOTAL)),
            start,
            stop,
            moa: String::new(),
            epc: String::new(),
            pe: String::new(),
            ddi: String::new(),
            se: String::new(),
        });
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} record groups with unparseable order times");
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ColumnLayout;

    fn row(cells: [Option<&str>; 7]) -> RawRow {
        RawRow {
            page: 0,
            key: 0,
            cells: cells.iter().map(|c| c.map(str::to_string)).collect(),
        }
    }

    /// One order wrapped across its three physical lines.
    fn order_rows(name: &str) -> Vec<RawRow> {
        vec![
            row([
                Some("2023-01-01"),
                Some(name),
                Some("500mg"),
                Some("PO"),
                Some("BID"),
                Some("2023-01-05"),
                Some("20TAB"),
            ]),
            row([Some("10:00"), None, None, None, None, Some("08:00"), None]),
            row([None; 7]),
        ]
    }

    #[test]
    fn parse_order_time_accepts_concatenated_date_time() {
        let t = parse_order_time("2023-01-0110:00").expect("valid combined value");
        assert_eq!(t.to_string(), "2023-01-01 10:00:00");
    }

    #[test]
    fn parse_order_time_rejects_ambiguous_strings() {
        // "2023-01" is malformed by construction; no guessing.
        assert!(parse_order_time("2023-0110:00").is_none());
        assert!(parse_order_time("").is_none());
        assert!(parse_order_time("2023-01-01 10:00").is_none());
    }

    #[test]
    fn clean_drug_name_takes_pre_delimiter_latin_prefix() {
        assert_eq!(clean_drug_name("Metformin 500mg<<Glucophage>>"), "Metformin");
        assert_eq!(clean_drug_name("Co-Trimoxazole<<Baktar>>"), "Co-Trimoxazole");
        assert_eq!(
            clean_drug_name("Insulin (human)<<Humulin R>>"),
            "Insulin (human)"
        );
    }

    #[test]
    fn clean_drug_name_keeps_letterless_input_verbatim() {
        assert_eq!(clean_drug_name("123ABC"), "123ABC");
    }

    #[test]
    fn fold_records_assembles_one_record_per_three_rows() {
        let layout = ColumnLayout::default();
        let mut rows = order_rows("Metformin<<Glucophage>>");
        rows.extend(order_rows("Aspirin<<Bokey>>"));
        let records = fold_records(&rows, &layout);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.generic_name, "Metformin");
        assert_eq!(first.issue_text, "2023-01-0110:00");
        assert_eq!(first.start.to_string(), "2023-01-01 10:00:00");
        assert_eq!(first.stop.to_string(), "2023-01-05 08:00:00");
        assert_eq!(first.dose, "500mg");
        assert_eq!(first.total, "20", "letters stripped from total quantity");
        assert!(first.moa.is_empty() && first.ddi.is_empty());
    }

    #[test]
    fn fold_records_attempts_trailing_partial_group() {
        let layout = ColumnLayout::default();
        // A single row carrying complete timestamps still yields a record.
        let rows = vec![row([
            Some("2023-01-0110:00"),
            Some("Aspirin<<Bokey>>"),
            Some("100mg"),
            Some("PO"),
            Some("QD"),
            Some("2023-01-0208:00"),
            None,
        ])];
        let records = fold_records(&rows, &layout);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].generic_name, "Aspirin");
        assert_eq!(records[0].total, "");
    }

    #[test]
    fn fold_records_drops_groups_with_unparseable_times() {
        let layout = ColumnLayout::default();
        let mut rows = order_rows("Metformin<<Glucophage>>");
        // Break the stop time of the first group.
        rows[0].cells[5] = Some("stopped".to_string());
        rows[1].cells[5] = None;
        rows.extend(order_rows("Aspirin<<Bokey>>"));
        let records = fold_records(&rows, &layout);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].generic_name, "Aspirin");
    }

    #[test]
    fn fold_records_empty_input_yields_no_records() {
        let layout = ColumnLayout::default();
        assert!(fold_records(&[], &layout).is_empty());
    }
}
