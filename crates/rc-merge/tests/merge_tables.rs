//! Integration tests for cross-run group merging.
//!
//! Covers:
//! - Union merge of disjoint attribute sets with exact axis matching
//! - Exclusion of axis-kind mismatches from a 3-member group
//! - Single-member pass-through
//! - Stable ordering of conflicting rows at equal axis values
//! - Per-group failure isolation and non-destructive sources

use rc_common::{AxisType, ChartError, RunStamp};
use rc_merge::{merge_all, merge_group, MergedRow};
use rc_store::{ChartDescriptor, ChartSpec, ChartStore, Snapshot};
use tempfile::TempDir;

fn recorded(
    store: &ChartStore,
    group: &str,
    stamp: &str,
    attr: &str,
    points: &[(u64, f64)],
) -> ChartDescriptor {
    let chart = ChartSpec::new()
        .group(group)
        .attribute(attr)
        .finish(&RunStamp::from_raw(stamp))
        .unwrap();
    store.create(&chart).unwrap();
    for (axis, value) in points {
        store
            .append(&chart, &Snapshot::at(*axis).with(attr, *value))
            .unwrap();
    }
    store.finalize(&chart).unwrap();
    chart
}

#[test]
fn union_merge_matches_exact_axis_values() {
    let dir = TempDir::new().unwrap();
    let store = ChartStore::new(dir.path()).unwrap();
    let a = recorded(&store, "g", "1", "a", &[(0, 1.0), (1, 2.0)]);
    let b = recorded(&store, "g", "2", "b", &[(0, 5.0), (2, 9.0)]);

    let outcome = merge_group(&store, &[&a, &b]).unwrap();
    assert!(outcome.excluded.is_empty());

    let chart = &outcome.chart;
    assert_eq!(chart.columns, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(
        chart.rows,
        vec![
            MergedRow {
                axis_value: 0,
                values: vec![Some(1.0), Some(5.0)],
            },
            MergedRow {
                axis_value: 1,
                values: vec![Some(2.0), None],
            },
            MergedRow {
                axis_value: 2,
                values: vec![None, Some(9.0)],
            },
        ]
    );
}

#[test]
fn mismatched_axis_member_is_dropped_and_rest_merges() {
    let dir = TempDir::new().unwrap();
    let store = ChartStore::new(dir.path()).unwrap();
    let a = recorded(&store, "g", "1", "a", &[(0, 1.0)]);
    let b = recorded(&store, "g", "2", "b", &[(0, 2.0)]);
    let odd = ChartSpec::new()
        .group("g")
        .axis_type(AxisType::Iteration)
        .attribute("c")
        .finish(&RunStamp::from_raw("3"))
        .unwrap();
    store.create(&odd).unwrap();
    store
        .append(&odd, &Snapshot::at(0).with("c", 3.0))
        .unwrap();
    store.finalize(&odd).unwrap();

    let outcome = merge_group(&store, &[&a, &odd, &b]).unwrap();
    assert_eq!(outcome.excluded.len(), 1);
    assert!(matches!(
        outcome.excluded[0],
        ChartError::IncompatibleGroup { .. }
    ));
    assert_eq!(outcome.chart.columns, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(outcome.chart.rows.len(), 1);
    assert_eq!(outcome.chart.rows[0].values, vec![Some(1.0), Some(2.0)]);
}

#[test]
fn single_member_group_is_a_copy() {
    let dir = TempDir::new().unwrap();
    let store = ChartStore::new(dir.path()).unwrap();
    let a = recorded(&store, "solo", "1", "a", &[(3, 1.5), (5, 2.5)]);

    let outcome = merge_group(&store, &[&a]).unwrap();
    assert!(outcome.excluded.is_empty());
    assert_eq!(outcome.chart.columns, vec!["a".to_string()]);
    assert_eq!(
        outcome.chart.rows,
        vec![
            MergedRow {
                axis_value: 3,
                values: vec![Some(1.5)],
            },
            MergedRow {
                axis_value: 5,
                values: vec![Some(2.5)],
            },
        ]
    );
}

#[test]
fn conflicting_rows_at_equal_axis_stay_standalone_in_order() {
    let dir = TempDir::new().unwrap();
    let store = ChartStore::new(dir.path()).unwrap();
    // Both members record the same attribute, so their rows at axis 0 claim
    // the same column slot and cannot merge.
    let a = recorded(&store, "g", "1", "avg", &[(0, 1.0)]);
    let b = recorded(&store, "g", "2", "avg", &[(0, 2.0)]);

    let outcome = merge_group(&store, &[&a, &b]).unwrap();
    assert_eq!(outcome.chart.columns, vec!["avg".to_string()]);
    assert_eq!(
        outcome.chart.rows,
        vec![
            MergedRow {
                axis_value: 0,
                values: vec![Some(1.0)],
            },
            MergedRow {
                axis_value: 0,
                values: vec![Some(2.0)],
            },
        ]
    );
}

#[test]
fn labels_come_from_first_member() {
    let dir = TempDir::new().unwrap();
    let store = ChartStore::new(dir.path()).unwrap();
    let a = ChartSpec::new()
        .group("g")
        .name("Throughput over time")
        .x_axis("Elapsed")
        .y_axis("msg/s")
        .attribute("a")
        .finish(&RunStamp::from_raw("1"))
        .unwrap();
    store.create(&a).unwrap();
    store.finalize(&a).unwrap();
    let b = recorded(&store, "g", "2", "b", &[(0, 1.0)]);

    let outcome = merge_group(&store, &[&a, &b]).unwrap();
    assert_eq!(outcome.chart.name, "Throughput over time");
    assert_eq!(outcome.chart.x_axis, "Elapsed");
    assert_eq!(outcome.chart.y_axis, "msg/s");
}

#[test]
fn busy_group_does_not_abort_other_groups() {
    let dir = TempDir::new().unwrap();
    let store = ChartStore::new(dir.path()).unwrap();
    let good = recorded(&store, "good", "1", "a", &[(0, 1.0)]);

    // Still open for writing: its group must fail with FileBusy.
    let busy = ChartSpec::new()
        .group("busy")
        .attribute("b")
        .finish(&RunStamp::from_raw("1"))
        .unwrap();
    store.create(&busy).unwrap();
    store
        .append(&busy, &Snapshot::at(0).with("b", 1.0))
        .unwrap();

    let descriptors = vec![busy.clone(), good.clone()];
    let report = merge_all(&store, &descriptors);
    assert!(!report.is_clean());
    assert_eq!(report.merged.len(), 1);
    assert_eq!(report.merged[0].group, "good");
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "busy");
    assert!(matches!(report.failed[0].1, ChartError::FileBusy { .. }));

    // Sources are untouched; after finalize the failed group retries fine.
    store.finalize(&busy).unwrap();
    let retry = merge_all(&store, &descriptors);
    assert!(retry.is_clean());
    assert_eq!(retry.merged.len(), 2);
    assert_eq!(store.read_rows(&good).unwrap().len(), 1);
}

#[test]
fn merge_all_on_scanned_store() {
    let dir = TempDir::new().unwrap();
    let store = ChartStore::new(dir.path()).unwrap();
    recorded(&store, "g", "1", "a", &[(0, 1.0)]);
    recorded(&store, "g", "2", "b", &[(0, 2.0)]);
    recorded(&store, "other", "1", "c", &[(5, 3.0)]);

    let descriptors = store.scan().unwrap();
    let report = merge_all(&store, &descriptors);
    assert!(report.is_clean());
    assert_eq!(report.merged.len(), 2);
}
