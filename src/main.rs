//! Demo binary: wires the coordinator to a simulated sensor, a file-backed
//! recording device, and logging haptics, then walks through the screen's
//! interactions.

use anyhow::Result;
use pulseband::{
    drive_haptics, AlwaysGranted, Coordinator, FileRecordingDevice, JsonPassiveStore, LogHaptics,
    RecordingConfig, ScreenControls, SimulatedHealthService,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulseband=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pulseband v{}", env!("CARGO_PKG_VERSION"));

    let config = RecordingConfig::default();
    let store = Arc::new(JsonPassiveStore::open(
        config.output_dir.join("passive-data.json"),
    )?);
    let health = Arc::new(SimulatedHealthService::new(store.clone()));
    let device = Arc::new(FileRecordingDevice::new());

    let coordinator = Coordinator::new(health, store, device, config);
    coordinator.initialize().await;

    tokio::spawn(drive_haptics(
        coordinator.subscribe_events(),
        Arc::new(LogHaptics),
    ));

    let controls = ScreenControls::new(coordinator.clone(), Arc::new(AlwaysGranted));

    // Enable passive monitoring and watch a few readings arrive.
    controls.press_toggle().await;
    let mut screen = coordinator.subscribe_state();
    let watch_until = tokio::time::Instant::now() + Duration::from_secs(4);
    loop {
        tokio::select! {
            changed = screen.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *screen.borrow_and_update();
                if state.has_reading() {
                    tracing::info!("heart rate: {:.1} bpm", state.heart_rate_bpm);
                }
            }
            _ = tokio::time::sleep_until(watch_until) => break,
        }
    }

    // A short manual recording, stopped by the button rather than the
    // two-minute deadline.
    controls.press_record().await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    controls.press_record().await;

    // Disable monitoring; the reading resets to the sentinel.
    controls.press_toggle().await;
    tracing::info!(
        "monitoring disabled, has reading: {}",
        coordinator.state().has_reading()
    );

    coordinator.shutdown().await;
    Ok(())
}
