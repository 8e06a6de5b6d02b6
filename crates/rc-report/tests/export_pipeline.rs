//! End-to-end test: record two runs, merge their shared group, export HTML.

use std::fs;

use rc_common::RunStamp;
use rc_merge::merge_all;
use rc_report::RenderExporter;
use rc_store::{ChartSpec, ChartStore, Snapshot};
use tempfile::TempDir;

#[test]
fn two_runs_merge_into_one_artifact() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("charts");

    // First run records averages.
    {
        let store = ChartStore::new(&data_dir).unwrap();
        let chart = ChartSpec::new()
            .group("throughput")
            .name("Throughput")
            .y_axis("msg/s")
            .attribute("avg")
            .finish(&RunStamp::from_raw("20260830120000"))
            .unwrap();
        store.create(&chart).unwrap();
        store
            .append(&chart, &Snapshot::at(0).with("avg", 10.0))
            .unwrap();
        store
            .append(&chart, &Snapshot::at(1000).with("avg", 12.0))
            .unwrap();
        store.finalize(&chart).unwrap();
    }

    // Second run, later stamp, records maxima into the same group.
    {
        let store = ChartStore::new(&data_dir).unwrap();
        let chart = ChartSpec::new()
            .group("throughput")
            .attribute("max")
            .finish(&RunStamp::from_raw("20260830130000"))
            .unwrap();
        store.create(&chart).unwrap();
        store
            .append(&chart, &Snapshot::at(1000).with("max", 20.0))
            .unwrap();
        store
            .append(&chart, &Snapshot::at(2000).with("max", 25.0))
            .unwrap();
        store.finalize(&chart).unwrap();
    }

    // A later process scans both runs and exports the merged group.
    let store = ChartStore::new(&data_dir).unwrap();
    let descriptors = store.scan().unwrap();
    assert_eq!(descriptors.len(), 2);

    let report = merge_all(&store, &descriptors);
    assert!(report.is_clean());
    assert_eq!(report.merged.len(), 1);

    let chart = &report.merged[0];
    assert_eq!(chart.columns, vec!["avg".to_string(), "max".to_string()]);
    assert_eq!(chart.rows.len(), 3);
    // Axis 1000 exists in both runs and merges into one row.
    assert_eq!(chart.rows[1].axis_value, 1000);
    assert_eq!(chart.rows[1].values, vec![Some(12.0), Some(20.0)]);

    let exporter = RenderExporter::new(dir.path().join("report")).unwrap();
    let path = exporter.export(chart).unwrap();
    let html = fs::read_to_string(&path).unwrap();
    assert!(html.contains("Throughput"));
    assert!(html.contains("msg/s"));
    assert!(html.contains(r#"["avg","max"]"#));
    assert!(html.contains("[1000,12.0,20.0]"));
}
