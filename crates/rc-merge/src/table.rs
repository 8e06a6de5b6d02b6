//! The combined table produced by merging one group.

use serde::Serialize;

use rc_common::AxisType;

/// One row of a merged table: an axis value plus one slot per combined
/// column. `None` marks "no data" for columns the contributing run did not
/// record; it renders as a gap, never as a zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    pub axis_value: u64,
    pub values: Vec<Option<f64>>,
}

/// The renderable result of merging one chart group.
///
/// Columns are the union of the members' attributes in first-seen order;
/// rows are ascending by axis value, ties keeping their per-file insertion
/// order. Labels come from the group's first member.
#[derive(Debug, Clone, Serialize)]
pub struct MergedChart {
    pub group: String,
    pub name: String,
    pub x_axis: String,
    pub y_axis: String,
    pub axis_type: AxisType,
    pub columns: Vec<String>,
    pub rows: Vec<MergedRow>,
    /// Base names of the runs that contributed rows.
    pub sources: Vec<String>,
}
