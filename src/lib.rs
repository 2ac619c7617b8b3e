//! Pulseband - passive heart-rate monitoring and manual voice capture for a
//! wearable screen.
//!
//! The crate is UI glue over platform services: a health service delivering
//! heart-rate readings, a persisted passive data store, an audio recording
//! device, and a haptics engine. The [`coordinator::Coordinator`] is the one
//! nontrivial piece, coordinating a subscribed sensor stream, a toggled
//! background registration, and a time-bounded recording session with a
//! guaranteed auto-stop.

pub mod config;
pub mod coordinator;
pub mod recorder;
pub mod sensor;
pub mod surface;
pub mod utils;

pub use config::RecordingConfig;
pub use coordinator::{Coordinator, RecordingEvent, ScreenState};
pub use recorder::{FileRecordingDevice, RecordingDevice, RecordingSession};
pub use sensor::{
    CapabilitySupport, HealthService, JsonPassiveStore, PassiveDataStore, SimulatedHealthService,
    NO_READING,
};
pub use surface::{
    display_status, drive_haptics, AlwaysGranted, AudioPermission, DisplayStatus, HapticPattern,
    Haptics, LogHaptics, ScreenControls,
};
pub use utils::error::{AppError, AppResult};
