//! Shared application state for the Observer API server.
//!
//! [`AppState`] couples the simulation service with the observer hub.
//! [`HubSink`] is the bridge the driver publishes through: each tick's
//! snapshot is serialized exactly once and the resulting frame fanned
//! out to every observer by the hub.

use std::sync::Arc;

use swarm_core::{Simulation, SnapshotSink};
use swarm_types::{StreamMessage, WorldSnapshot};
use tracing::{debug, warn};

use crate::hub::BroadcastHub;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The simulation service commands and queries act on.
    pub sim: Arc<Simulation>,
    /// Registry of connected observers.
    pub hub: Arc<BroadcastHub>,
}

impl AppState {
    /// Assemble the application state.
    pub const fn new(sim: Arc<Simulation>, hub: Arc<BroadcastHub>) -> Self {
        Self { sim, hub }
    }
}

/// [`SnapshotSink`] that serializes each tick once and fans it out.
pub struct HubSink {
    /// The hub frames are delivered through.
    hub: Arc<BroadcastHub>,
}

impl HubSink {
    /// Create a sink publishing through `hub`.
    pub const fn new(hub: Arc<BroadcastHub>) -> Self {
        Self { hub }
    }
}

impl SnapshotSink for HubSink {
    fn publish(&self, snapshot: WorldSnapshot) {
        let tick_time = snapshot.simulation_time;
        match serde_json::to_string(&StreamMessage::StateUpdate(snapshot)) {
            Ok(json) => {
                let frame: Arc<str> = Arc::from(json);
                self.hub.broadcast(&frame);
                debug!(
                    simulation_time = tick_time,
                    observers = self.hub.observer_count(),
                    "tick broadcast"
                );
            }
            Err(e) => warn!(error = %e, "failed to serialize state update"),
        }
    }
}
