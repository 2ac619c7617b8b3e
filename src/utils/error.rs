//! Error types and handling
//!
//! Common error types used across the application.

use thiserror::Error;

/// Application-wide error type
///
/// Every failure in the monitoring and recording paths is recovered locally;
/// none of these reach the presentation surface as a crash.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Capability probe failed: {0}")]
    CapabilityProbe(String),

    #[error("Recording device failed to start: {0}")]
    DeviceStart(String),

    #[error("Recording device failed to stop: {0}")]
    DeviceStop(String),

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("Sensor error: {0}")]
    Sensor(String),
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
