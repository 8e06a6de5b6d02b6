//! Snapshots and their on-disk row encoding.
//!
//! A data file line is the axis value followed by one value per declared
//! attribute, comma separated, e.g. `1500,12.5,null,40`. Attributes absent
//! from a snapshot are written as the [`NO_DATA`] marker rather than a zero;
//! a zero would plot as a real measurement and corrupt the curve.

use std::collections::HashMap;

/// On-disk marker for "no value recorded". The downstream charting layer
/// treats it as a gap in the series.
pub const NO_DATA: &str = "null";

/// One reported measurement: an axis value plus named attribute values.
///
/// Arrival order of the attributes is irrelevant; the appender aligns them
/// against the descriptor's declared column order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    axis_value: u64,
    values: HashMap<String, f64>,
}

impl Snapshot {
    /// Snapshot at the given axis value (millis offset, iteration, or
    /// percent, per the chart's axis kind).
    pub fn at(axis_value: u64) -> Self {
        Self {
            axis_value,
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, attribute: impl Into<String>, value: f64) -> Self {
        self.values.insert(attribute.into(), value);
        self
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: f64) {
        self.values.insert(attribute.into(), value);
    }

    pub fn axis_value(&self) -> u64 {
        self.axis_value
    }

    pub fn get(&self, attribute: &str) -> Option<f64> {
        self.values.get(attribute).copied()
    }
}

/// One decoded data-file row: axis value plus positionally aligned values.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub axis_value: u64,
    pub values: Vec<Option<f64>>,
}

impl DataRow {
    /// Align a snapshot against the declared attribute order.
    pub fn from_snapshot(snapshot: &Snapshot, attributes: &[String]) -> Self {
        Self {
            axis_value: snapshot.axis_value(),
            values: attributes.iter().map(|a| snapshot.get(a)).collect(),
        }
    }

    /// Encode as one data-file line (without the trailing newline).
    pub fn to_line(&self) -> String {
        let mut line = self.axis_value.to_string();
        for value in &self.values {
            line.push(',');
            match value {
                Some(v) => line.push_str(&v.to_string()),
                None => line.push_str(NO_DATA),
            }
        }
        line
    }

    /// Decode one data-file line. Returns `None` when the line is not a
    /// well-formed row; the caller attaches path and line number.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split(',');
        let axis_value = parts.next()?.trim().parse().ok()?;
        let mut values = Vec::new();
        for part in parts {
            let part = part.trim();
            if part == NO_DATA {
                values.push(None);
            } else {
                values.push(Some(part.parse().ok()?));
            }
        }
        Some(Self { axis_value, values })
    }
}
