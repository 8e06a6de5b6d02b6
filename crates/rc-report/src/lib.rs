//! HTML artifact generation for merged charts.
//!
//! The exporter consumes the merged table contract (ordered columns, ordered
//! rows, label strings) and produces one self-contained HTML file per chart
//! group: data embedded as JSON, drawing done by a small inline script, no
//! external assets.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use tracing::debug;

use rc_common::{ChartError, Result};
use rc_merge::MergedChart;

#[derive(Template)]
#[template(path = "chart.html")]
struct ChartTemplate<'a> {
    name: &'a str,
    x_axis: &'a str,
    y_axis: &'a str,
    columns_json: String,
    data_json: String,
}

/// Render a merged chart into a self-contained HTML document.
pub fn render(chart: &MergedChart) -> Result<String> {
    let template = ChartTemplate {
        name: &chart.name,
        x_axis: &chart.x_axis,
        y_axis: &chart.y_axis,
        columns_json: serde_json::to_string(&chart.columns)?,
        data_json: rows_json(chart)?,
    };
    template
        .render()
        .map_err(|e| ChartError::Render(e.to_string()))
}

/// Encode rows as a JSON array of `[axis, v1, v2, ...]` arrays; missing
/// values become `null` so the renderer draws gaps instead of zeros.
fn rows_json(chart: &MergedChart) -> Result<String> {
    let rows: Vec<Vec<serde_json::Value>> = chart
        .rows
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(row.values.len() + 1);
            cells.push(serde_json::json!(row.axis_value));
            cells.extend(row.values.iter().map(|value| match value {
                Some(v) => serde_json::json!(v),
                None => serde_json::Value::Null,
            }));
            cells
        })
        .collect();
    Ok(serde_json::to_string(&rows)?)
}

/// Writes rendered chart artifacts into an output directory.
#[derive(Debug)]
pub struct RenderExporter {
    output_dir: PathBuf,
}

impl RenderExporter {
    /// Create an exporter, creating the output directory if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|e| ChartError::io(&output_dir, e))?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render and write `<group>.html`, returning the written path.
    pub fn export(&self, chart: &MergedChart) -> Result<PathBuf> {
        let html = render(chart)?;
        let path = self.output_dir.join(format!("{}.html", chart.group));
        fs::write(&path, html).map_err(|e| ChartError::io(&path, e))?;
        debug!(group = %chart.group, path = %path.display(), "artifact written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_common::AxisType;
    use rc_merge::MergedRow;

    fn sample() -> MergedChart {
        MergedChart {
            group: "throughput".into(),
            name: "Throughput".into(),
            x_axis: "Time".into(),
            y_axis: "msg/s".into(),
            axis_type: AxisType::Time,
            columns: vec!["a".into(), "b".into()],
            rows: vec![
                MergedRow {
                    axis_value: 0,
                    values: vec![Some(1.0), Some(5.0)],
                },
                MergedRow {
                    axis_value: 1,
                    values: vec![Some(2.0), None],
                },
            ],
            sources: vec!["throughput1".into()],
        }
    }

    #[test]
    fn render_embeds_labels_columns_and_rows() {
        let html = render(&sample()).unwrap();
        assert!(html.contains("<title>Throughput</title>"));
        assert!(html.contains("Time"));
        assert!(html.contains("msg/s"));
        assert!(html.contains(r#"["a","b"]"#));
        assert!(html.contains("[[0,1.0,5.0],[1,2.0,null]]"));
    }

    #[test]
    fn missing_values_render_as_null_not_zero() {
        let html = render(&sample()).unwrap();
        assert!(html.contains("null]"));
        assert!(!html.contains("[1,2.0,0]"));
    }

    #[test]
    fn export_writes_group_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = RenderExporter::new(dir.path().join("report")).unwrap();
        let path = exporter.export(&sample()).unwrap();
        assert_eq!(path.file_name().unwrap(), "throughput.html");
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("Throughput"));
    }
}
