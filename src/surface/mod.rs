//! Presentation surface contract
//!
//! The screen itself is a platform concern; this module holds everything it
//! consumes and produces: the display status derived from the published
//! snapshot, the haptic pattern identifiers, the event-to-haptics driver,
//! and the permission-gated intent layer behind the on-screen controls.

mod controls;
mod haptics;

pub use controls::{AlwaysGranted, AudioPermission, ScreenControls};
pub use haptics::{drive_haptics, HapticPattern, Haptics, LogHaptics};

use crate::coordinator::state::ScreenState;
use crate::sensor::traits::CapabilitySupport;
use serde::{Deserialize, Serialize};

/// What the screen should render, distinct per state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayStatus {
    /// Capability probe has not finished
    Startup,
    /// No heart-rate sensor on this device
    NotSupported,
    /// Sensor present, monitoring switched off
    Disabled,
    /// Passive monitoring running
    Monitoring,
    /// Manual recording in progress
    Recording,
}

/// Derive the rendered status from a snapshot.
pub fn display_status(state: &ScreenState) -> DisplayStatus {
    match state.capability {
        CapabilitySupport::Unknown => DisplayStatus::Startup,
        CapabilitySupport::Unsupported => DisplayStatus::NotSupported,
        CapabilitySupport::Supported => {
            if state.recording {
                DisplayStatus::Recording
            } else if state.monitoring_enabled {
                DisplayStatus::Monitoring
            } else {
                DisplayStatus::Disabled
            }
        }
    }
}
