//! Monitoring and recording coordinator
//!
//! Single authoritative owner of the screen state: capability support, the
//! monitoring-enabled flag, the current reading, and the recording session.
//! Sole caller of the health service and recording device mutators. All
//! mutations are serialized through one control lock, so the sensor stream,
//! the deadline timer, and user intents never race each other.

use crate::config::RecordingConfig;
use crate::coordinator::state::ScreenState;
use crate::recorder::device::RecordingDevice;
use crate::recorder::session::RecordingSession;
use crate::sensor::traits::{CapabilitySupport, HealthService, PassiveDataStore, NO_READING};
use crate::utils::error::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::{AbortHandle, JoinHandle};
use uuid::Uuid;

/// Events emitted on confirmed recording transitions
#[derive(Debug, Clone)]
pub enum RecordingEvent {
    /// Capture confirmed started
    Started,
    /// Capture stopped, by the user or by the deadline
    Stopped,
}

/// Why a stop was requested
#[derive(Clone, Copy)]
enum StopReason {
    User,
    /// Deadline fired for the session with this id; a stale timer must never
    /// stop a successor session
    Deadline(Uuid),
}

/// Mutable state behind the control lock
struct Control {
    session: Option<RecordingSession>,
    /// Enabled value last applied to the health service, used to issue
    /// exactly one register/unregister per actual flag flip
    applied_enabled: Option<bool>,
}

struct Inner {
    health: Arc<dyn HealthService>,
    store: Arc<dyn PassiveDataStore>,
    device: Arc<dyn RecordingDevice>,
    config: RecordingConfig,
    state_tx: watch::Sender<ScreenState>,
    event_tx: broadcast::Sender<RecordingEvent>,
    control: Mutex<Control>,
    /// One-shot deadline for the active session, cancellable
    deadline: parking_lot::Mutex<Option<AbortHandle>>,
    /// Task forwarding store readings into the published snapshot
    forwarder: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

/// Coordinates passive monitoring and manual recordings
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

impl Coordinator {
    pub fn new(
        health: Arc<dyn HealthService>,
        store: Arc<dyn PassiveDataStore>,
        device: Arc<dyn RecordingDevice>,
        config: RecordingConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(ScreenState::default());
        let (event_tx, _) = broadcast::channel(100);
        Self {
            inner: Arc::new(Inner {
                health,
                store,
                device,
                config,
                state_tx,
                event_tx,
                control: Mutex::new(Control {
                    session: None,
                    applied_enabled: None,
                }),
                deadline: parking_lot::Mutex::new(None),
                forwarder: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Current snapshot
    pub fn state(&self) -> ScreenState {
        *self.inner.state_tx.borrow()
    }

    /// Subscribe to published snapshots
    pub fn subscribe_state(&self) -> watch::Receiver<ScreenState> {
        self.inner.state_tx.subscribe()
    }

    /// Subscribe to recording transition events
    pub fn subscribe_events(&self) -> broadcast::Receiver<RecordingEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Whether a recording session is active
    pub fn is_recording(&self) -> bool {
        self.state().recording
    }

    /// Probe capability support, apply the persisted monitoring flag, and
    /// start forwarding readings into the snapshot.
    ///
    /// Runs the probe exactly once; a probe failure degrades to Unsupported
    /// rather than failing startup.
    pub async fn initialize(&self) {
        let capability = match self.inner.health.has_heart_rate_capability().await {
            Ok(true) => CapabilitySupport::Supported,
            Ok(false) => CapabilitySupport::Unsupported,
            Err(e) => {
                tracing::warn!("capability probe failed, reporting unsupported: {}", e);
                CapabilitySupport::Unsupported
            }
        };
        self.inner
            .state_tx
            .send_modify(|s| s.capability = capability);
        tracing::info!("heart-rate capability: {:?}", capability);

        // A flag persisted as enabled from a previous run re-registers
        // without a user toggle. A persisted false registers nothing, so
        // there is nothing to unregister either.
        let enabled = match self.inner.store.passive_enabled().await {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::warn!("could not read the persisted monitoring flag: {}", e);
                false
            }
        };
        {
            let mut control = self.inner.control.lock().await;
            control.applied_enabled = Some(enabled);
            if enabled {
                if let Err(e) = self.inner.health.register_for_heart_rate().await {
                    tracing::warn!("failed to register for heart-rate updates: {}", e);
                    control.applied_enabled = Some(false);
                }
            }
        }
        self.inner
            .state_tx
            .send_modify(|s| s.monitoring_enabled = enabled);

        // Forward store readings into the snapshot until shutdown.
        let mut updates = self.inner.store.heart_rate_updates();
        let inner = Arc::clone(&self.inner);
        let forwarder = tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let bpm = *updates.borrow_and_update();
                inner.state_tx.send_modify(|s| s.heart_rate_bpm = bpm);
            }
        });
        if let Some(previous) = self.inner.forwarder.lock().replace(forwarder) {
            previous.abort();
        }
    }

    /// Flip the persisted monitoring flag.
    pub async fn toggle_monitoring(&self) -> AppResult<()> {
        let enabled = self.state().monitoring_enabled;
        self.set_monitoring_enabled(!enabled).await
    }

    /// Persist a new monitoring flag and apply it.
    ///
    /// Register/unregister is issued only when the applied value actually
    /// changes, never once per write. Disabling wipes the last reading to
    /// the sentinel.
    pub async fn set_monitoring_enabled(&self, enabled: bool) -> AppResult<()> {
        let mut control = self.inner.control.lock().await;
        self.inner.store.set_passive_enabled(enabled).await?;

        if control.applied_enabled != Some(enabled) {
            if enabled {
                self.inner.health.register_for_heart_rate().await?;
                tracing::info!("registered for heart-rate updates");
            } else {
                self.inner.health.unregister_for_heart_rate().await?;
                tracing::info!("unregistered from heart-rate updates");
            }
            control.applied_enabled = Some(enabled);
        }

        if !enabled {
            // Monitoring is now off, wipe the last value.
            self.inner.store.store_latest_heart_rate(NO_READING).await?;
            self.inner
                .state_tx
                .send_modify(|s| s.heart_rate_bpm = NO_READING);
        }
        self.inner
            .state_tx
            .send_modify(|s| s.monitoring_enabled = enabled);
        Ok(())
    }

    /// Start a manual recording.
    ///
    /// Rejected while a session is active. On device-start failure the
    /// session is discarded: no state change, no event, no deadline armed.
    pub async fn start_recording(&self) -> AppResult<()> {
        let mut control = self.inner.control.lock().await;
        if control.session.is_some() {
            tracing::debug!("start ignored, a recording is already active");
            return Err(AppError::AlreadyRecording);
        }

        let session = RecordingSession::new(&self.inner.config);
        tracing::info!("starting recording to {}", session.output_path.display());
        if let Err(e) = self.inner.device.start(&session.output_path).await {
            tracing::warn!("recording device failed to start: {}", e);
            return Err(e);
        }

        // Arm the one-shot auto-stop deadline for this session.
        let session_id = session.id;
        let max_recording = self.inner.config.max_recording;
        let inner = Arc::clone(&self.inner);
        let deadline = tokio::spawn(async move {
            tokio::time::sleep(max_recording).await;
            inner.stop(StopReason::Deadline(session_id)).await;
        });
        *self.inner.deadline.lock() = Some(deadline.abort_handle());

        control.session = Some(session);
        drop(control);

        self.inner.state_tx.send_modify(|s| s.recording = true);
        let _ = self.inner.event_tx.send(RecordingEvent::Started);
        Ok(())
    }

    /// Stop the active recording; a no-op when idle.
    pub async fn stop_recording(&self) -> AppResult<()> {
        self.inner.stop(StopReason::User).await;
        Ok(())
    }

    /// Tear down: stop any active session, cancel the reading forwarder,
    /// and release the sensor registration. The persisted flag is left
    /// untouched so monitoring resumes on the next startup.
    pub async fn shutdown(&self) {
        self.inner.stop(StopReason::User).await;

        if let Some(forwarder) = self.inner.forwarder.lock().take() {
            forwarder.abort();
        }

        let mut control = self.inner.control.lock().await;
        if control.applied_enabled == Some(true) {
            if let Err(e) = self.inner.health.unregister_for_heart_rate().await {
                tracing::warn!("failed to unregister during shutdown: {}", e);
            }
            control.applied_enabled = Some(false);
        }
    }
}

impl Inner {
    /// Shared stop path for user stops and deadline firings.
    ///
    /// Device-stop failure is best-effort: the session is cleared regardless
    /// so the screen can never be stuck showing a recording with no way out.
    async fn stop(&self, reason: StopReason) {
        let mut control = self.control.lock().await;
        let Some(session) = control.session.take() else {
            tracing::debug!("stop ignored, no recording active");
            return;
        };

        if let StopReason::Deadline(id) = reason {
            if id != session.id {
                control.session = Some(session);
                return;
            }
            tracing::info!("recording hit the maximum duration, forcing stop");
        }

        // Cancel the armed deadline. The deadline task skips the abort on
        // its own handle so it is not cancelled mid-stop.
        if let Some(armed) = self.deadline.lock().take() {
            if matches!(reason, StopReason::User) {
                armed.abort();
            }
        }

        if let Err(e) = self.device.stop().await {
            tracing::warn!("recording device failed to stop: {}", e);
        }
        drop(control);

        self.state_tx.send_modify(|s| s.recording = false);
        let _ = self.event_tx.send(RecordingEvent::Stopped);
        tracing::info!(
            "recording stopped, file: {}",
            session.output_path.display()
        );
    }
}
