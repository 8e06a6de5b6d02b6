//! Runchart common types and errors.
//!
//! This crate provides foundational types shared across the runchart crates:
//! - The X-axis kind of a recorded chart
//! - The process-wide run stamp embedded in chart base names
//! - The unified error type

pub mod axis;
pub mod error;
pub mod stamp;

pub use axis::AxisType;
pub use error::{ChartError, Result};
pub use stamp::RunStamp;
