//! Recording configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for manual recordings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingConfig {
    /// Directory that receives the capture files
    pub output_dir: PathBuf,

    /// Extension for capture files (container format is the device's concern)
    pub file_extension: String,

    /// Maximum duration of a single recording; the coordinator forces a stop
    /// when this elapses
    pub max_recording: Duration,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output_dir: std::env::temp_dir().join("pulseband"),
            file_extension: "m4a".to_string(),
            max_recording: Duration::from_secs(120),
        }
    }
}
