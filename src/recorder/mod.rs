//! Manual recording support
//!
//! - RecordingDevice trait for the platform capture pipeline
//! - RecordingSession model and the timestamped output naming

pub mod device;
pub mod session;

pub use device::{FileRecordingDevice, RecordingDevice};
pub use session::RecordingSession;
