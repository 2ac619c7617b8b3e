//! Recording session model

use crate::config::RecordingConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// A single manual recording in progress
///
/// At most one session exists at a time; it is owned by the coordinator and
/// destroyed when the recording stops, whether by user action or by the
/// deadline timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSession {
    /// Session identity, used to fence the deadline timer
    pub id: Uuid,

    /// When the recording started
    pub started_at: DateTime<Utc>,

    /// Capture file for this session
    pub output_path: PathBuf,
}

impl RecordingSession {
    /// Create a session starting now.
    ///
    /// The capture file is named `Manual-<yyyy-MM-dd-HH-mm-ss>.<ext>` from
    /// the session start time.
    pub fn new(config: &RecordingConfig) -> Self {
        let started_at = Utc::now();
        let file_name = format!(
            "Manual-{}.{}",
            started_at.format("%Y-%m-%d-%H-%M-%S"),
            config.file_extension
        );
        Self {
            id: Uuid::new_v4(),
            started_at,
            output_path: config.output_dir.join(file_name),
        }
    }
}
