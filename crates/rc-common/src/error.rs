//! Error types for runchart operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::axis::AxisType;

/// Result type alias for runchart operations.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Unified error type for chart recording, merging, and export.
#[derive(Error, Debug)]
pub enum ChartError {
    // Descriptor errors (10-19)
    #[error("invalid chart state: {0}")]
    InvalidState(String),

    #[error("chart '{base_name}' was read back from storage and cannot be modified or stored again")]
    ImmutableChart { base_name: String },

    // Storage errors (20-29)
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed data row at {path}:{line}")]
    MalformedRow { path: PathBuf, line: usize },

    // Merge errors (30-39)
    #[error("data file of chart '{base_name}' is still open for writing")]
    FileBusy { base_name: String },

    #[error(
        "chart '{base_name}' does not fit group '{group}': x axis is {actual}, group uses {expected}"
    )]
    IncompatibleGroup {
        group: String,
        base_name: String,
        expected: AxisType,
        actual: AxisType,
    },

    // Export errors (40-49)
    #[error("render failed: {0}")]
    Render(String),
}

impl ChartError {
    /// Numeric code for machine-readable output.
    pub fn code(&self) -> u32 {
        match self {
            ChartError::InvalidState(_) => 10,
            ChartError::ImmutableChart { .. } => 11,
            ChartError::Io { .. } => 20,
            ChartError::Json(_) => 21,
            ChartError::MalformedRow { .. } => 22,
            ChartError::FileBusy { .. } => 30,
            ChartError::IncompatibleGroup { .. } => 31,
            ChartError::Render(_) => 40,
        }
    }

    /// Whether the caller may retry the failed operation as-is.
    ///
    /// Storage unavailability and still-open data files are transient; the
    /// remaining variants are programming or data errors that a retry cannot
    /// fix.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChartError::Io { .. } | ChartError::FileBusy { .. }
        )
    }

    /// Convenience constructor for I/O failures tagged with their path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChartError::Io {
            path: path.into(),
            source,
        }
    }
}
