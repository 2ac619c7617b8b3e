//! Heart-rate sensor access
//!
//! Traits for the platform health service and the persisted passive data
//! store, plus the file-backed store and a simulated service for tests and
//! the demo binary.

pub mod sim;
pub mod store;
pub mod traits;

pub use sim::SimulatedHealthService;
pub use store::JsonPassiveStore;
pub use traits::{CapabilitySupport, HealthService, PassiveDataStore, NO_READING};
