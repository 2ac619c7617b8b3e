//! Sensor trait definitions
//!
//! Platform-agnostic traits for the heart-rate capability service and the
//! passive data store. Platform bindings implement these; the coordinator is
//! their only mutating caller.

use crate::utils::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Sentinel for "no heart-rate reading available" (distinct from zero).
pub const NO_READING: f64 = f64::NAN;

/// Whether the platform exposes a heart-rate sensor
///
/// Written once by the coordinator during startup, read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilitySupport {
    /// Probe has not completed yet
    Unknown,
    /// Heart-rate data is available on this device
    Supported,
    /// No heart-rate sensor, or the probe failed
    Unsupported,
}

impl Default for CapabilitySupport {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Access to the platform's heart-rate capability
///
/// Registration is not assumed idempotent: callers must issue at most one
/// register/unregister call per enable/disable transition.
#[async_trait]
pub trait HealthService: Send + Sync {
    /// Probe whether a heart-rate sensor is present
    async fn has_heart_rate_capability(&self) -> AppResult<bool>;

    /// Begin delivering heart-rate updates into the passive data store
    async fn register_for_heart_rate(&self) -> AppResult<()>;

    /// Stop delivering heart-rate updates
    async fn unregister_for_heart_rate(&self) -> AppResult<()>;
}

/// Persisted monitoring flag plus the live latest-reading fan-out
///
/// The enabled flag survives restarts; the latest reading is a hot value
/// that observers watch. Storing [`NO_READING`] wipes the reading.
#[async_trait]
pub trait PassiveDataStore: Send + Sync {
    /// Read the persisted enabled flag
    async fn passive_enabled(&self) -> AppResult<bool>;

    /// Persist a new enabled flag value
    async fn set_passive_enabled(&self, enabled: bool) -> AppResult<()>;

    /// Publish the most recent heart-rate reading (BPM)
    async fn store_latest_heart_rate(&self, bpm: f64) -> AppResult<()>;

    /// Live view of the most recent reading
    fn heart_rate_updates(&self) -> watch::Receiver<f64>;
}
