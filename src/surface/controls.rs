//! Screen control intents
//!
//! The logic behind the two on-screen controls: the monitoring toggle and
//! the record button. The record button gates starting on the audio
//! permission, mirroring the platform's grant-then-start flow; errors are
//! logged and swallowed so the surface never crashes.

use crate::coordinator::Coordinator;
use std::sync::Arc;

/// Audio recording permission probe
pub trait AudioPermission: Send + Sync {
    /// Whether recording audio is currently allowed
    fn is_granted(&self) -> bool;

    /// Prompt the user; returns the resulting grant state
    fn request(&self) -> bool;
}

/// Permission probe that always reports granted, for the demo binary
pub struct AlwaysGranted;

impl AudioPermission for AlwaysGranted {
    fn is_granted(&self) -> bool {
        true
    }

    fn request(&self) -> bool {
        true
    }
}

/// Intent layer for the wearable screen's controls
pub struct ScreenControls {
    coordinator: Coordinator,
    permission: Arc<dyn AudioPermission>,
}

impl ScreenControls {
    pub fn new(coordinator: Coordinator, permission: Arc<dyn AudioPermission>) -> Self {
        Self {
            coordinator,
            permission,
        }
    }

    /// The monitoring toggle was pressed.
    pub async fn press_toggle(&self) {
        if let Err(e) = self.coordinator.toggle_monitoring().await {
            tracing::warn!("could not toggle monitoring: {}", e);
        }
    }

    /// The record button was pressed: stop while recording, otherwise start
    /// once the audio permission is granted.
    pub async fn press_record(&self) {
        if self.coordinator.is_recording() {
            if let Err(e) = self.coordinator.stop_recording().await {
                tracing::warn!("could not stop recording: {}", e);
            }
            return;
        }

        let granted = self.permission.is_granted() || self.permission.request();
        if !granted {
            tracing::info!("record press ignored, audio permission not granted");
            return;
        }

        if let Err(e) = self.coordinator.start_recording().await {
            tracing::warn!("could not start recording: {}", e);
        }
    }
}
