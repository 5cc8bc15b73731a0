//! Simulation lifecycle: the clock, the driver task, and the one lock.
//!
//! [`Simulation`] wraps the [`World`] behind a single [`Mutex`] and owns
//! the fixed-cadence driver task that advances it. Every entry point
//! that touches the world -- the driver's `step`, command handlers,
//! state queries -- goes through the same lock, so a reader can never
//! observe a half-applied tick.
//!
//! Lifecycle is `Stopped --start--> Running --stop--> Stopped`. There is
//! no paused state: `stop` halts the cadence but preserves world content
//! (time and roster) until an explicit `reset` wipes both. `start` is
//! idempotent -- at most one driver task exists at a time, and the task
//! handle is joinable so `reset` can wait out an in-flight tick before
//! reinitializing.
//!
//! After each step the driver serializes a snapshot under the lock and
//! hands it to the [`SnapshotSink`] outside the lock; fan-out to slow
//! observers can therefore never delay the next tick.

use std::sync::Arc;
use std::time::Duration;

use swarm_types::{
    AgentId, AgentPatch, AgentSnapshot, Metrics, MissionKind, MissionSnapshot, WorldSnapshot,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WorldConfig;
use crate::world::{World, WorldError};

/// Fixed simulated timestep per tick, in seconds (~60 steps/sec).
pub const FIXED_DT: f64 = 0.016;

/// Receiver of per-tick world snapshots.
///
/// The driver publishes one snapshot after every completed step. The
/// implementation must not block: fan-out with bounded delivery happens
/// downstream, never on the tick path.
pub trait SnapshotSink: Send + Sync {
    /// Deliver a freshly produced snapshot to observers.
    fn publish(&self, snapshot: WorldSnapshot);
}

/// Sink that discards snapshots (tests and headless runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl SnapshotSink for NoOpSink {
    fn publish(&self, _snapshot: WorldSnapshot) {}
}

/// The simulation service: world ownership plus clock lifecycle.
pub struct Simulation {
    /// The single authoritative world, behind the one lock.
    world: Arc<Mutex<World>>,
    /// Handle of the driver task, if one was ever started.
    driver: Mutex<Option<JoinHandle<()>>>,
    /// Where per-tick snapshots are published.
    sink: Arc<dyn SnapshotSink>,
    /// Wall-clock cadence between steps.
    tick_interval: Duration,
}

impl Simulation {
    /// Construct a stopped simulation with a freshly initialized world.
    pub fn new(config: &WorldConfig, sink: Arc<dyn SnapshotSink>) -> Self {
        Self {
            world: Arc::new(Mutex::new(World::new(config))),
            driver: Mutex::new(None),
            sink,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
        }
    }

    /// Start the driver task. Idempotent: if a driver is already
    /// running, no second one is created and `false` is returned.
    ///
    /// Returns immediately; ticking happens on a background task.
    pub async fn start(&self) -> bool {
        let mut driver = self.driver.lock().await;

        let already_running = driver.as_ref().is_some_and(|handle| !handle.is_finished())
            && self.world.lock().await.is_running();
        if already_running {
            debug!("start ignored: driver already active");
            return false;
        }

        // A previous driver may still be draining after a stop; wait it
        // out so two tasks never step the same world.
        if let Some(stale) = driver.take() {
            if let Err(e) = stale.await {
                warn!(error = %e, "previous driver task ended abnormally");
            }
        }

        self.world.lock().await.set_running(true);
        *driver = Some(tokio::spawn(drive(
            Arc::clone(&self.world),
            Arc::clone(&self.sink),
            self.tick_interval,
        )));
        info!("simulation started");
        true
    }

    /// Request a stop. Idempotent. The driver observes the flag at its
    /// next cadence boundary; one in-flight tick may still complete
    /// (and broadcast) after this returns.
    pub async fn stop(&self) {
        self.world.lock().await.set_running(false);
        info!("simulation stop requested");
    }

    /// Stop, wait for the in-flight tick to finish, then reinitialize
    /// the environment. Always leaves the simulation stopped; callers
    /// must issue [`start`](Self::start) again to resume.
    pub async fn reset(&self) {
        let mut driver = self.driver.lock().await;
        self.world.lock().await.set_running(false);

        if let Some(handle) = driver.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "driver task ended abnormally during reset");
            }
        }

        self.world.lock().await.initialize_environment();
        info!("simulation reset");
    }

    /// Whether the world is currently being driven.
    pub async fn is_running(&self) -> bool {
        self.world.lock().await.is_running()
    }

    /// Full world snapshot (also the broadcast payload shape).
    pub async fn state(&self) -> WorldSnapshot {
        self.world.lock().await.snapshot()
    }

    /// Aggregate metrics only.
    pub async fn metrics(&self) -> Metrics {
        self.world.lock().await.metrics()
    }

    /// Snapshot one agent.
    pub async fn agent(&self, id: AgentId) -> Result<AgentSnapshot, WorldError> {
        self.world.lock().await.agent(id)
    }

    /// Apply a partial mutation to one agent.
    pub async fn mutate_agent(
        &self,
        id: AgentId,
        patch: &AgentPatch,
    ) -> Result<AgentSnapshot, WorldError> {
        self.world.lock().await.mutate_agent(id, patch)
    }

    /// Create a mission over `(x, y)`.
    pub async fn create_mission(&self, x: f64, y: f64, kind: MissionKind) -> MissionSnapshot {
        self.world.lock().await.create_mission(x, y, kind)
    }
}

/// The driver loop: step, snapshot under the lock, publish outside it,
/// sleep one cadence interval, repeat until the world is stopped.
///
/// A missed cadence is absorbed into the next interval; there is no
/// catch-up of elapsed ticks.
async fn drive(world: Arc<Mutex<World>>, sink: Arc<dyn SnapshotSink>, interval: Duration) {
    debug!("driver task entering tick loop");
    loop {
        let snapshot = {
            let mut world = world.lock().await;
            if !world.is_running() {
                break;
            }
            world.step(FIXED_DT);
            world.snapshot()
        };
        sink.publish(snapshot);
        tokio::time::sleep(interval).await;
    }
    debug!("driver task exited");
}
