//! State coordination
//!
//! The coordinator owns the published screen state and is the only caller
//! of the health service and recording device mutators.

pub mod coordinator;
pub mod state;

pub use coordinator::{Coordinator, RecordingEvent};
pub use state::ScreenState;
