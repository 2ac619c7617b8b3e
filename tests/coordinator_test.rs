//! Coordinator behavior tests with counting mock collaborators.

use async_trait::async_trait;
use pulseband::{
    AppError, AppResult, CapabilitySupport, Coordinator, HealthService, PassiveDataStore,
    RecordingConfig, RecordingDevice, RecordingEvent, NO_READING,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::watch;

#[derive(Default)]
struct MockHealth {
    supported: bool,
    fail_probe: bool,
    registers: AtomicUsize,
    unregisters: AtomicUsize,
}

impl MockHealth {
    fn supported() -> Self {
        Self {
            supported: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl HealthService for MockHealth {
    async fn has_heart_rate_capability(&self) -> AppResult<bool> {
        if self.fail_probe {
            return Err(AppError::CapabilityProbe("probe exploded".to_string()));
        }
        Ok(self.supported)
    }

    async fn register_for_heart_rate(&self) -> AppResult<()> {
        self.registers.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn unregister_for_heart_rate(&self) -> AppResult<()> {
        self.unregisters.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MockStore {
    enabled: AtomicBool,
    latest_tx: watch::Sender<f64>,
}

impl MockStore {
    fn new(enabled: bool) -> Self {
        let (latest_tx, _) = watch::channel(NO_READING);
        Self {
            enabled: AtomicBool::new(enabled),
            latest_tx,
        }
    }
}

#[async_trait]
impl PassiveDataStore for MockStore {
    async fn passive_enabled(&self) -> AppResult<bool> {
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn set_passive_enabled(&self, enabled: bool) -> AppResult<()> {
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    async fn store_latest_heart_rate(&self, bpm: f64) -> AppResult<()> {
        self.latest_tx.send_replace(bpm);
        Ok(())
    }

    fn heart_rate_updates(&self) -> watch::Receiver<f64> {
        self.latest_tx.subscribe()
    }
}

#[derive(Default)]
struct MockDevice {
    starts: AtomicUsize,
    stops: AtomicUsize,
    fail_start: bool,
    fail_stop: bool,
}

#[async_trait]
impl RecordingDevice for MockDevice {
    async fn start(&self, _path: &Path) -> AppResult<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(AppError::DeviceStart("device is busy".to_string()));
        }
        Ok(())
    }

    async fn stop(&self) -> AppResult<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop {
            return Err(AppError::DeviceStop("already released".to_string()));
        }
        Ok(())
    }
}

struct Harness {
    coordinator: Coordinator,
    health: Arc<MockHealth>,
    store: Arc<MockStore>,
    device: Arc<MockDevice>,
}

fn harness(health: MockHealth, store: MockStore, device: MockDevice) -> Harness {
    let health = Arc::new(health);
    let store = Arc::new(store);
    let device = Arc::new(device);
    let coordinator = Coordinator::new(
        health.clone(),
        store.clone(),
        device.clone(),
        RecordingConfig::default(),
    );
    Harness {
        coordinator,
        health,
        store,
        device,
    }
}

fn default_harness() -> Harness {
    harness(
        MockHealth::supported(),
        MockStore::new(false),
        MockDevice::default(),
    )
}

/// Let spawned tasks run to completion on the current-thread test runtime.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn probe_sets_capability_support() {
    let h = default_harness();
    h.coordinator.initialize().await;
    assert_eq!(h.coordinator.state().capability, CapabilitySupport::Supported);

    let none = harness(
        MockHealth::default(),
        MockStore::new(false),
        MockDevice::default(),
    );
    none.coordinator.initialize().await;
    assert_eq!(
        none.coordinator.state().capability,
        CapabilitySupport::Unsupported
    );
}

#[tokio::test]
async fn probe_failure_reports_unsupported() {
    let h = harness(
        MockHealth {
            fail_probe: true,
            ..MockHealth::default()
        },
        MockStore::new(false),
        MockDevice::default(),
    );
    h.coordinator.initialize().await;
    assert_eq!(
        h.coordinator.state().capability,
        CapabilitySupport::Unsupported
    );
}

#[tokio::test]
async fn toggling_registers_once_per_flip() {
    let h = default_harness();
    h.coordinator.initialize().await;

    // Repeated identical writes must not duplicate registration.
    h.coordinator.set_monitoring_enabled(true).await.unwrap();
    h.coordinator.set_monitoring_enabled(true).await.unwrap();
    assert_eq!(h.health.registers.load(Ordering::SeqCst), 1);
    assert_eq!(h.health.unregisters.load(Ordering::SeqCst), 0);

    h.coordinator.set_monitoring_enabled(false).await.unwrap();
    h.coordinator.set_monitoring_enabled(false).await.unwrap();
    assert_eq!(h.health.registers.load(Ordering::SeqCst), 1);
    assert_eq!(h.health.unregisters.load(Ordering::SeqCst), 1);

    // Balance never drifts past one in either direction.
    for _ in 0..5 {
        h.coordinator.toggle_monitoring().await.unwrap();
        let registers = h.health.registers.load(Ordering::SeqCst) as i64;
        let unregisters = h.health.unregisters.load(Ordering::SeqCst) as i64;
        assert!((registers - unregisters).abs() <= 1);
    }
}

#[tokio::test]
async fn persisted_flag_registers_at_startup() {
    let h = harness(
        MockHealth::supported(),
        MockStore::new(true),
        MockDevice::default(),
    );
    h.coordinator.initialize().await;
    assert_eq!(h.health.registers.load(Ordering::SeqCst), 1);
    assert!(h.coordinator.state().monitoring_enabled);

    // A persisted false registers nothing, and unregisters nothing either.
    let off = default_harness();
    off.coordinator.initialize().await;
    assert_eq!(off.health.registers.load(Ordering::SeqCst), 0);
    assert_eq!(off.health.unregisters.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn disabling_clears_the_reading() {
    let h = default_harness();
    h.coordinator.initialize().await;
    h.coordinator.set_monitoring_enabled(true).await.unwrap();

    h.store.store_latest_heart_rate(72.0).await.unwrap();
    let mut screen = h.coordinator.subscribe_state();
    screen
        .wait_for(|s| s.heart_rate_bpm == 72.0)
        .await
        .unwrap();

    h.coordinator.set_monitoring_enabled(false).await.unwrap();
    let state = h.coordinator.state();
    assert!(!state.has_reading());
    assert!(state.heart_rate_bpm.is_nan());
    // The store's live value is wiped too.
    assert!(h.store.heart_rate_updates().borrow().is_nan());
}

#[tokio::test]
async fn double_start_is_rejected() {
    let h = default_harness();
    h.coordinator.initialize().await;
    let mut events = h.coordinator.subscribe_events();

    h.coordinator.start_recording().await.unwrap();
    let second = h.coordinator.start_recording().await;
    assert!(matches!(second, Err(AppError::AlreadyRecording)));

    assert_eq!(h.device.starts.load(Ordering::SeqCst), 1);
    assert!(matches!(events.try_recv(), Ok(RecordingEvent::Started)));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    h.coordinator.stop_recording().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn deadline_forces_stop_exactly_once() {
    let h = default_harness();
    h.coordinator.initialize().await;

    h.coordinator.start_recording().await.unwrap();
    assert!(h.coordinator.is_recording());

    // Never stopped manually: the deadline transitions back to idle.
    let mut screen = h.coordinator.subscribe_state();
    screen.wait_for(|s| !s.recording).await.unwrap();
    assert_eq!(h.device.stops.load(Ordering::SeqCst), 1);

    // And only once, no matter how much more time passes.
    tokio::time::advance(Duration::from_secs(600)).await;
    settle().await;
    assert_eq!(h.device.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn manual_stop_cancels_the_deadline() {
    let h = default_harness();
    h.coordinator.initialize().await;
    let mut events = h.coordinator.subscribe_events();

    h.coordinator.start_recording().await.unwrap();
    tokio::time::advance(Duration::from_secs(10)).await;
    h.coordinator.stop_recording().await.unwrap();
    assert_eq!(h.device.stops.load(Ordering::SeqCst), 1);

    // Past the original deadline: no further stop side effects.
    tokio::time::advance(Duration::from_secs(150)).await;
    settle().await;
    assert_eq!(h.device.stops.load(Ordering::SeqCst), 1);
    assert!(!h.coordinator.is_recording());

    assert!(matches!(events.try_recv(), Ok(RecordingEvent::Started)));
    assert!(matches!(events.try_recv(), Ok(RecordingEvent::Stopped)));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn start_failure_leaves_idle_with_no_deadline() {
    let h = harness(
        MockHealth::supported(),
        MockStore::new(false),
        MockDevice {
            fail_start: true,
            ..MockDevice::default()
        },
    );
    h.coordinator.initialize().await;
    let mut events = h.coordinator.subscribe_events();

    let result = h.coordinator.start_recording().await;
    assert!(matches!(result, Err(AppError::DeviceStart(_))));
    assert!(!h.coordinator.is_recording());
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    // No timer was armed, so nothing fires later.
    tokio::time::advance(Duration::from_secs(150)).await;
    settle().await;
    assert_eq!(h.device.stops.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn stop_when_idle_is_a_noop() {
    let h = default_harness();
    h.coordinator.initialize().await;
    let mut events = h.coordinator.subscribe_events();

    h.coordinator.stop_recording().await.unwrap();
    assert_eq!(h.device.stops.load(Ordering::SeqCst), 0);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn stop_failure_still_clears_the_session() {
    let h = harness(
        MockHealth::supported(),
        MockStore::new(false),
        MockDevice {
            fail_stop: true,
            ..MockDevice::default()
        },
    );
    h.coordinator.initialize().await;

    h.coordinator.start_recording().await.unwrap();
    h.coordinator.stop_recording().await.unwrap();
    assert!(!h.coordinator.is_recording());

    // The screen is not stuck: a fresh session can start.
    h.coordinator.start_recording().await.unwrap();
    assert_eq!(h.device.starts.load(Ordering::SeqCst), 2);
    h.coordinator.stop_recording().await.unwrap();
}

#[tokio::test]
async fn shutdown_releases_the_registration() {
    let h = default_harness();
    h.coordinator.initialize().await;
    h.coordinator.set_monitoring_enabled(true).await.unwrap();

    h.coordinator.shutdown().await;
    assert_eq!(h.health.unregisters.load(Ordering::SeqCst), 1);
    // The persisted flag keeps the user's intent for the next startup.
    assert!(h.store.passive_enabled().await.unwrap());
}
