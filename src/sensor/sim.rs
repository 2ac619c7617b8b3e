//! Simulated heart-rate service
//!
//! Stands in for a platform health-services binding so the demo binary and
//! tests can run anywhere. Registration starts a feed task that writes a
//! slowly drifting BPM into the passive data store; unregistration stops it.

use crate::sensor::traits::{HealthService, PassiveDataStore};
use crate::utils::error::AppResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Health service that synthesizes readings instead of touching hardware
pub struct SimulatedHealthService {
    store: Arc<dyn PassiveDataStore>,
    interval: Duration,
    feed: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedHealthService {
    pub fn new(store: Arc<dyn PassiveDataStore>) -> Self {
        Self {
            store,
            interval: Duration::from_millis(500),
            feed: Mutex::new(None),
        }
    }

    /// Override how often synthetic readings are produced.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

#[async_trait]
impl HealthService for SimulatedHealthService {
    async fn has_heart_rate_capability(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn register_for_heart_rate(&self) -> AppResult<()> {
        let store = Arc::clone(&self.store);
        let interval = self.interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut phase: f64 = 0.0;
            loop {
                ticker.tick().await;
                phase += 0.35;
                // Resting rate with a gentle oscillation.
                let bpm = 64.0 + 7.0 * phase.sin();
                if let Err(e) = store.store_latest_heart_rate(bpm).await {
                    tracing::warn!("failed to publish simulated reading: {}", e);
                    break;
                }
            }
        });

        // Callers register at most once per enable transition, but a stale
        // feed must never outlive its replacement.
        if let Some(previous) = self.feed.lock().replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    async fn unregister_for_heart_rate(&self) -> AppResult<()> {
        if let Some(feed) = self.feed.lock().take() {
            feed.abort();
        }
        Ok(())
    }
}
