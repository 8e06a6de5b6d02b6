//! Run-scoped timestamp embedded in chart base names.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Compact timestamp identifying one test run of one process.
///
/// Created once at process start and passed explicitly to everything that
/// needs it; two processes recording into the same directory stay distinct
/// because their stamps differ. The value is fixed at creation, so a base
/// name derived from it can never drift mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunStamp(String);

impl RunStamp {
    /// Capture the current local time as a `yyyymmddHHMMSS` stamp.
    pub fn now() -> Self {
        Self(Local::now().format("%Y%m%d%H%M%S").to_string())
    }

    /// Build a stamp from a raw string (tests, replaying historical runs).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
