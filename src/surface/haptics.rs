//! Haptic feedback contract
//!
//! Pattern identifiers and the driver that maps confirmed recording
//! transitions onto pulses. Which platform vibrator API backs the trait is
//! not this crate's concern.

use crate::coordinator::RecordingEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Haptic pulse patterns the device can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HapticPattern {
    /// One short buzz, played when a recording starts
    SingleShort,
    /// Two short buzzes, played when a recording stops
    DoubleShort,
}

/// Something that can play a haptic pulse
pub trait Haptics: Send + Sync {
    fn pulse(&self, pattern: HapticPattern);
}

/// Haptics that only log, for the demo binary
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn pulse(&self, pattern: HapticPattern) {
        tracing::info!("haptic pulse: {:?}", pattern);
    }
}

/// Pump coordinator events into haptic pulses until the coordinator goes
/// away.
///
/// Exactly one pulse per transition: SingleShort on a confirmed start,
/// DoubleShort on any stop, user-initiated or deadline-initiated alike.
pub async fn drive_haptics(
    mut events: broadcast::Receiver<RecordingEvent>,
    haptics: Arc<dyn Haptics>,
) {
    loop {
        match events.recv().await {
            Ok(RecordingEvent::Started) => haptics.pulse(HapticPattern::SingleShort),
            Ok(RecordingEvent::Stopped) => haptics.pulse(HapticPattern::DoubleShort),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!("haptics driver lagged, {} events missed", missed);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
