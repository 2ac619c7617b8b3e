//! Published screen state
//!
//! The coordinator is the single writer; observers receive immutable
//! per-update snapshots through a watch channel.

use crate::sensor::traits::{CapabilitySupport, NO_READING};
use serde::{Deserialize, Serialize};

/// Everything the screen renders, in one snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenState {
    /// Result of the startup capability probe
    pub capability: CapabilitySupport,

    /// Latest heart-rate reading in BPM, or NaN when there is none
    pub heart_rate_bpm: f64,

    /// Persisted passive-monitoring flag as last applied
    pub monitoring_enabled: bool,

    /// Whether a manual recording is in progress
    pub recording: bool,
}

impl ScreenState {
    /// Whether a real reading (not the sentinel) is available
    pub fn has_reading(&self) -> bool {
        !self.heart_rate_bpm.is_nan()
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            capability: CapabilitySupport::Unknown,
            heart_rate_bpm: NO_READING,
            monitoring_enabled: false,
            recording: false,
        }
    }
}
