//! Recording device abstraction
//!
//! Platform-agnostic trait for the audio capture device, plus a file-backed
//! implementation used by the demo binary. Real platform pipelines (codec
//! selection included) live behind this seam.

use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// An audio capture device
///
/// Start and stop are blocking-but-fast device operations. Start failure
/// means the capture never began; stop failure means the resource may have
/// leaked, and callers are expected to clear their own state regardless.
#[async_trait]
pub trait RecordingDevice: Send + Sync {
    /// Prepare the device and begin capturing to `path`
    async fn start(&self, path: &Path) -> AppResult<()>;

    /// Stop capturing and release the device
    async fn stop(&self) -> AppResult<()>;
}

/// Capture device that writes to a plain file
pub struct FileRecordingDevice {
    active: Mutex<Option<PathBuf>>,
}

impl FileRecordingDevice {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
        }
    }
}

impl Default for FileRecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordingDevice for FileRecordingDevice {
    async fn start(&self, path: &Path) -> AppResult<()> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(AppError::DeviceStart("device is busy".to_string()));
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::DeviceStart(e.to_string()))?;
        }
        tokio::fs::File::create(path)
            .await
            .map_err(|e| AppError::DeviceStart(e.to_string()))?;

        tracing::debug!("capture file created: {}", path.display());
        *active = Some(path.to_path_buf());
        Ok(())
    }

    async fn stop(&self) -> AppResult<()> {
        let mut active = self.active.lock().await;
        match active.take() {
            Some(path) => {
                tracing::debug!("capture file closed: {}", path.display());
                Ok(())
            }
            None => Err(AppError::DeviceStop("no capture in progress".to_string())),
        }
    }
}
