//! Tests for row-scoped rejection of malformed cells

use rumor_core::{ConditionSpec, Error, MetricSpec};
use rumor_data::{Normalizer, NormalizerConfig, TableSchema};
use std::collections::BTreeSet;

const AWARENESS: &str = "count turtles with [rumor-known?] / population-size";

fn normalizer() -> Normalizer {
    let schema = TableSchema::new()
        .with_condition(ConditionSpec::boolean("rumor-is-true?"))
        .with_metric(MetricSpec::new(AWARENESS).with_label("Awareness (%)").with_scale(100.0));
    Normalizer::new(NormalizerConfig::default().with_header_lines(2), schema)
}

fn csv_with_rows(rows: &[&str]) -> String {
    let mut text = String::from("preamble line one\npreamble line two\n");
    text.push_str(&format!("\"[run number]\",\"rumor-is-true?\",\"{AWARENESS}\"\n"));
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

#[test]
fn test_non_numeric_metric_is_scoped_to_its_row() {
    let csv = csv_with_rows(&["1,true,0.40", "2,false,n/a", "3,false,0.65", "4,true,0.35"]);
    let normalized = normalizer().read(csv.as_bytes()).unwrap();

    assert_eq!(normalized.table.run_ids(), BTreeSet::from([1, 3, 4]));
    assert_eq!(normalized.rejected.len(), 1);
    match &normalized.rejected[0] {
        Error::MalformedValue { row, column, value } => {
            assert_eq!(*row, 1);
            assert_eq!(column, AWARENESS);
            assert_eq!(value, "n/a");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_every_bad_cell_is_reported() {
    let csv = csv_with_rows(&["x,maybe,abc", "2,true,0.5"]);
    let normalized = normalizer().read(csv.as_bytes()).unwrap();

    assert_eq!(normalized.table.run_count(), 1);
    assert_eq!(normalized.rejected.len(), 3);
    assert_eq!(normalized.rejected_rows(), BTreeSet::from([0]));
}

#[test]
fn test_short_record_is_rejected() {
    let csv = csv_with_rows(&["1,true", "2,false,0.5"]);
    let normalized = normalizer().read(csv.as_bytes()).unwrap();
    assert_eq!(normalized.table.run_count(), 1);
    assert_eq!(normalized.rejected_rows(), BTreeSet::from([0]));
}

#[test]
fn test_metric_spec_is_kept() {
    let csv = csv_with_rows(&["1,true,0.5"]);
    let normalized = normalizer().read(csv.as_bytes()).unwrap();
    let spec = normalized.metric_spec(AWARENESS).unwrap();
    assert_eq!(spec.label(), "Awareness (%)");
    assert_eq!(spec.display(0.5), 50.0);
}

#[test]
fn test_missing_file() {
    let result = normalizer().read_path("definitely/not/here.csv");
    assert!(matches!(result, Err(Error::MissingFile(_))));
}
