//! JSON-file-backed passive data store
//!
//! Persists the monitoring-enabled flag across restarts and fans out the
//! latest heart-rate reading to watchers.

use crate::sensor::traits::{PassiveDataStore, NO_READING};
use crate::utils::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::{watch, Mutex};

/// On-disk shape of the persisted settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSettings {
    passive_enabled: bool,
}

/// Passive data store backed by a single JSON file
pub struct JsonPassiveStore {
    path: PathBuf,
    settings: Mutex<PersistedSettings>,
    latest_tx: watch::Sender<f64>,
}

impl JsonPassiveStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts with monitoring disabled; an unreadable file is
    /// an error so a corrupt settings file is noticed rather than silently
    /// reset.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let settings = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            PersistedSettings::default()
        };

        let (latest_tx, _) = watch::channel(NO_READING);
        Ok(Self {
            path,
            settings: Mutex::new(settings),
            latest_tx,
        })
    }

    async fn save(&self, settings: &PersistedSettings) -> AppResult<()> {
        let raw = serde_json::to_vec_pretty(settings)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl PassiveDataStore for JsonPassiveStore {
    async fn passive_enabled(&self) -> AppResult<bool> {
        Ok(self.settings.lock().await.passive_enabled)
    }

    async fn set_passive_enabled(&self, enabled: bool) -> AppResult<()> {
        let mut settings = self.settings.lock().await;
        settings.passive_enabled = enabled;
        self.save(&settings).await
    }

    async fn store_latest_heart_rate(&self, bpm: f64) -> AppResult<()> {
        self.latest_tx.send_replace(bpm);
        Ok(())
    }

    fn heart_rate_updates(&self) -> watch::Receiver<f64> {
        self.latest_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn enabled_flag_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passive-data.json");

        let store = JsonPassiveStore::open(&path).unwrap();
        assert!(!store.passive_enabled().await.unwrap());
        store.set_passive_enabled(true).await.unwrap();
        drop(store);

        let reopened = JsonPassiveStore::open(&path).unwrap();
        assert!(reopened.passive_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn readings_start_at_the_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPassiveStore::open(dir.path().join("s.json")).unwrap();

        let rx = store.heart_rate_updates();
        assert!(rx.borrow().is_nan());

        store.store_latest_heart_rate(71.5).await.unwrap();
        assert_eq!(*store.heart_rate_updates().borrow(), 71.5);
    }
}
