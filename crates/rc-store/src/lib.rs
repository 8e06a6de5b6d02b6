//! Chart descriptor persistence and append-only data recording.
//!
//! One test run produces, per chart, a JSON metadata record and an
//! append-only data file. Descriptors are built mutably via [`ChartSpec`],
//! frozen into a [`ChartDescriptor`] when the run stamp is applied, and can
//! be read back later for merging; read-back descriptors can never be stored
//! again.

pub mod descriptor;
pub mod row;
pub mod store;

pub use descriptor::{ChartDescriptor, ChartShape, ChartSpec, Origin, DATA_FILE_PREFIX};
pub use row::{DataRow, Snapshot, NO_DATA};
pub use store::ChartStore;
