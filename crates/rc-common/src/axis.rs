//! X-axis kinds for recorded charts.

use serde::{Deserialize, Serialize};

/// How test progress is expressed on the X axis of a chart.
///
/// Charts recorded with different axis kinds are structurally incompatible
/// and are never merged together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisType {
    /// Elapsed time since the start of the run, in milliseconds.
    #[default]
    Time,
    /// Iteration counter of the generator.
    Iteration,
    /// Percentage of the run completed (0-100).
    Percentage,
}

impl AxisType {
    /// Heading used for the axis column in rendered output.
    pub fn column_label(&self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Iteration => "Iteration",
            Self::Percentage => "Percents",
        }
    }
}

impl std::fmt::Display for AxisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Time => write!(f, "time"),
            Self::Iteration => write!(f, "iteration"),
            Self::Percentage => write!(f, "percentage"),
        }
    }
}
