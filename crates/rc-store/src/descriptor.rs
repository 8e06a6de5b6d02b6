//! Chart descriptors: the mutable build phase and the frozen record.
//!
//! The lifecycle is a two-type split: [`ChartSpec`] is the builder used while
//! a chart is being configured, and [`ChartSpec::finish`] freezes it into a
//! [`ChartDescriptor`] that exposes getters only. A descriptor read back from
//! storage carries [`Origin::Loaded`] and is rejected by
//! `ChartStore::create`, so a persisted chart can never be mutated or stored
//! twice.

use std::collections::BTreeSet;

use rc_common::{AxisType, ChartError, Result, RunStamp};

/// Prefix of the data files belonging to recorded charts.
pub const DATA_FILE_PREFIX: &str = "data_";

/// Extension of the per-chart data file.
const DATA_FILE_EXT: &str = "csv";

/// Extension of the per-chart metadata record.
const META_FILE_EXT: &str = "json";

/// Where a descriptor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Built in this process during chart setup.
    Created,
    /// Read back from a persisted metadata record.
    Loaded,
}

/// Mutable chart configuration, usable only before the chart is frozen.
#[derive(Debug, Clone, Default)]
pub struct ChartSpec {
    name: Option<String>,
    x_axis: Option<String>,
    y_axis: Option<String>,
    axis_type: AxisType,
    attributes: Vec<String>,
    group: Option<String>,
}

impl ChartSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Human-readable chart name. Defaults to the group name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// X-axis legend. Defaults to the axis kind's column label.
    pub fn x_axis(mut self, label: impl Into<String>) -> Self {
        self.x_axis = Some(label.into());
        self
    }

    /// Y-axis legend. Defaults to "Value".
    pub fn y_axis(mut self, label: impl Into<String>) -> Self {
        self.y_axis = Some(label.into());
        self
    }

    pub fn axis_type(mut self, axis_type: AxisType) -> Self {
        self.axis_type = axis_type;
        self
    }

    /// Append one recorded attribute. Order of calls fixes the on-disk
    /// column order.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    /// Replace the attribute list wholesale.
    pub fn attributes(mut self, names: Vec<String>) -> Self {
        self.attributes = names;
        self
    }

    /// Merge group key shared by charts from different runs.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Freeze the spec into an immutable descriptor.
    ///
    /// The base name is computed exactly once here, as the group name
    /// followed by the run stamp; later stamps can never change it. Fails
    /// with `InvalidState` when the group is unset or no attributes were
    /// declared.
    pub fn finish(self, stamp: &RunStamp) -> Result<ChartDescriptor> {
        let group = self
            .group
            .ok_or_else(|| ChartError::InvalidState("group is not set".into()))?;
        if self.attributes.is_empty() {
            return Err(ChartError::InvalidState(format!(
                "chart in group '{group}' declares no attributes"
            )));
        }
        let base_name = format!("{group}{stamp}");

        Ok(ChartDescriptor {
            name: self.name.unwrap_or_else(|| group.clone()),
            x_axis: self
                .x_axis
                .unwrap_or_else(|| self.axis_type.column_label().to_string()),
            y_axis: self.y_axis.unwrap_or_else(|| "Value".to_string()),
            axis_type: self.axis_type,
            attributes: self.attributes,
            group,
            base_name,
            origin: Origin::Created,
        })
    }
}

/// Frozen metadata of one recorded chart.
///
/// All fields are fixed at [`ChartSpec::finish`] or at read-back; there are
/// no setters in either case.
#[derive(Debug, Clone)]
pub struct ChartDescriptor {
    name: String,
    x_axis: String,
    y_axis: String,
    axis_type: AxisType,
    attributes: Vec<String>,
    group: String,
    base_name: String,
    origin: Origin,
}

impl ChartDescriptor {
    /// Reconstruct a descriptor from a persisted metadata record.
    pub(crate) fn loaded(
        name: String,
        x_axis: String,
        y_axis: String,
        axis_type: AxisType,
        attributes: Vec<String>,
        group: String,
        base_name: String,
    ) -> Self {
        Self {
            name,
            x_axis,
            y_axis,
            axis_type,
            attributes,
            group,
            base_name,
            origin: Origin::Loaded,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x_axis(&self) -> &str {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &str {
        &self.y_axis
    }

    pub fn axis_type(&self) -> AxisType {
        self.axis_type
    }

    /// Recorded attributes in on-disk column order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Base of the file names of this chart, `<group><run stamp>`.
    /// Unique per run; merge identity uses [`ChartShape`] instead.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Structural identity used when matching charts for merging: the axis
    /// kind plus the normalized attribute set. Base names differ per run by
    /// design and take no part in matching.
    pub fn shape(&self) -> ChartShape {
        ChartShape {
            axis_type: self.axis_type,
            attributes: self.attributes.iter().cloned().collect(),
        }
    }

    /// File name of the append-only data file.
    pub fn data_file_name(&self) -> String {
        format!("{DATA_FILE_PREFIX}{}.{DATA_FILE_EXT}", self.base_name)
    }

    /// File name of the metadata record.
    pub fn meta_file_name(&self) -> String {
        format!("{}.{META_FILE_EXT}", self.base_name)
    }
}

impl std::fmt::Display for ChartDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chart{{base_name='{}', name='{}', x_axis='{}', y_axis='{}', axis_type={}, attributes={:?}, group='{}'}}",
            self.base_name, self.name, self.x_axis, self.y_axis, self.axis_type, self.attributes, self.group,
        )
    }
}

/// Comparable structural key of a chart: axis kind + attribute set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartShape {
    pub axis_type: AxisType,
    pub attributes: BTreeSet<String>,
}
