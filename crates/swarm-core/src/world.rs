//! The authoritative world: roster, obstacles, stations, missions.
//!
//! [`World`] is the single source of truth for all simulation state. It
//! owns every entity exclusively; nothing leaves except immutable
//! snapshot copies. All mutation paths -- the fixed-cadence [`step`],
//! mission creation, and external agent patches -- go through `&mut self`,
//! so the caller's locking discipline (one mutex around the world) is the
//! whole concurrency story.
//!
//! Randomness comes from a [`SmallRng`] owned by the world, seeded from
//! configuration. A fixed seed makes initialization and physics fully
//! deterministic for tests; production leaves the seed unset and draws
//! one from the OS.
//!
//! [`step`]: World::step

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use swarm_types::{
    AgentId, AgentMetrics, AgentPatch, AgentSnapshot, ChargingStation, CommunicationMetrics,
    Metrics, MissionId, MissionKind, MissionMetrics, MissionSnapshot, MissionStatus, Obstacle,
    ObstacleId, ObstacleKind, PerformanceMetrics, StationId, TargetArea, Vec3, WorldSnapshot,
};
use tracing::{debug, info};

use crate::agent::Agent;
use crate::config::WorldConfig;

/// Number of missions seeded at environment initialization.
const SEED_MISSION_COUNT: usize = 3;

/// Cap on concurrently active missions.
const ACTIVE_MISSION_CAP: usize = 5;

/// Per-tick probability of opportunistically spawning a mission.
const MISSION_SPAWN_PROBABILITY: f64 = 0.002;

/// Upper bound of the per-tick mission progress increment.
const MISSION_PROGRESS_STEP: f64 = 0.01;

/// Errors surfaced by world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The requested agent id is outside the current roster.
    #[error("agent {id} not found")]
    AgentNotFound {
        /// The id that was requested.
        id: AgentId,
    },
}

/// A mission: a region of work assigned to a subset of the roster.
///
/// Progress is monotone non-decreasing while active; the transition to
/// completed happens exactly once, at progress `>= 1.0`, and never
/// reverts. Missions are never deleted.
#[derive(Debug, Clone)]
pub struct Mission {
    /// Mission count at creation time; never reused.
    id: MissionId,
    /// Category of work.
    kind: MissionKind,
    /// Region the mission operates over.
    target_area: TargetArea,
    /// Agents assigned at creation.
    assigned_agents: Vec<AgentId>,
    /// Lifecycle status.
    status: MissionStatus,
    /// Completion fraction in `[0, 1]`.
    completion_progress: f64,
}

impl Mission {
    /// Create an active mission.
    const fn new(
        id: MissionId,
        kind: MissionKind,
        target_area: TargetArea,
        assigned_agents: Vec<AgentId>,
        completion_progress: f64,
    ) -> Self {
        Self {
            id,
            kind,
            target_area,
            assigned_agents,
            status: MissionStatus::Active,
            completion_progress,
        }
    }

    /// Advance progress by `amount`, capped at 1.0 and never decreasing.
    ///
    /// Returns `true` when this call performed the one-time transition
    /// to completed.
    fn advance(&mut self, amount: f64) -> bool {
        if self.status == MissionStatus::Completed {
            return false;
        }
        self.completion_progress = (self.completion_progress + amount.max(0.0)).min(1.0);
        if self.completion_progress >= 1.0 {
            self.status = MissionStatus::Completed;
            return true;
        }
        false
    }

    /// Whether the mission is still accumulating progress.
    pub const fn is_active(&self) -> bool {
        matches!(self.status, MissionStatus::Active)
    }

    /// Mission identifier.
    pub const fn id(&self) -> MissionId {
        self.id
    }

    /// Current completion fraction.
    pub const fn completion_progress(&self) -> f64 {
        self.completion_progress
    }

    /// Immutable serializable view of the mission.
    pub fn snapshot(&self) -> MissionSnapshot {
        MissionSnapshot {
            id: self.id,
            kind: self.kind,
            target_area: self.target_area,
            assigned_agents: self.assigned_agents.clone(),
            status: self.status,
            completion_progress: self.completion_progress,
        }
    }
}

/// The full simulation world.
///
/// Constructed from a [`WorldConfig`]; [`initialize_environment`] runs at
/// construction and again on every reset, replacing all entities
/// wholesale.
///
/// [`initialize_environment`]: World::initialize_environment
#[derive(Debug)]
pub struct World {
    /// Configured roster size.
    num_agents: usize,
    /// Side length of the square arena.
    environment_size: f64,
    /// The fixed-size agent roster.
    agents: Vec<Agent>,
    /// Obstacles, immutable between resets.
    obstacles: Vec<Obstacle>,
    /// Charging stations, immutable between resets.
    charging_stations: Vec<ChargingStation>,
    /// All missions ever created, completed ones included.
    missions: Vec<Mission>,
    /// Simulated seconds elapsed; monotone accumulator of `dt`.
    simulation_time: f64,
    /// Whether `step` advances the world.
    running: bool,
    /// World-owned random source.
    rng: SmallRng,
}

impl World {
    /// Construct a world and initialize its environment.
    pub fn new(config: &WorldConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        let mut world = Self {
            num_agents: config.num_agents,
            environment_size: config.environment_size,
            agents: Vec::new(),
            obstacles: Vec::new(),
            charging_stations: Vec::new(),
            missions: Vec::new(),
            simulation_time: 0.0,
            running: false,
            rng,
        };
        world.initialize_environment();
        world
    }

    /// (Re)generate agents, obstacles, charging stations, and the seed
    /// mission batch. Total replacement -- no diffing against prior state.
    ///
    /// Afterwards `simulation_time` is 0 and the world is stopped; reset
    /// never auto-resumes.
    #[allow(clippy::cast_possible_truncation)]
    pub fn initialize_environment(&mut self) {
        let half = self.environment_size / 2.0;

        let mut agents = Vec::with_capacity(self.num_agents);
        for i in 0..self.num_agents {
            let position = Vec3::new(
                self.rng.random_range(-half..half),
                self.rng.random_range(-half..half),
                self.rng.random_range(0.0..10.0),
            );
            agents.push(Agent::spawn(AgentId(i as u32), position, &mut self.rng));
        }
        self.agents = agents;

        let obstacle_count: u32 = self.rng.random_range(10..=25);
        let mut obstacles = Vec::with_capacity(obstacle_count as usize);
        for i in 0..obstacle_count {
            obstacles.push(Obstacle {
                id: ObstacleId(i),
                position: Vec3::new(
                    self.rng.random_range(-half..half),
                    self.rng.random_range(-half..half),
                    self.rng.random_range(0.0..8.0),
                ),
                size: self.rng.random_range(3.0..10.0),
                kind: if self.rng.random_bool(0.5) {
                    ObstacleKind::Static
                } else {
                    ObstacleKind::Dynamic
                },
            });
        }
        self.obstacles = obstacles;

        let station_count = (self.num_agents / 15).max(3);
        let mut stations = Vec::with_capacity(station_count);
        for i in 0..station_count {
            stations.push(ChargingStation {
                id: StationId(i as u32),
                position: Vec3::new(
                    self.rng.random_range(-half..half),
                    self.rng.random_range(-half..half),
                    0.0,
                ),
                charging_rate: self.rng.random_range(30.0..60.0),
                capacity: self.rng.random_range(5..=12),
            });
        }
        self.charging_stations = stations;

        self.missions = Vec::new();
        for _ in 0..SEED_MISSION_COUNT {
            let kind = self.random_mission_kind();
            let target_area = self.random_target_area();
            let assigned = self.sample_assignment(20, 3, 8);
            let progress = self.rng.random_range(0.2..0.8);
            let mission = Mission::new(self.next_mission_id(), kind, target_area, assigned, progress);
            self.missions.push(mission);
        }

        self.simulation_time = 0.0;
        self.running = false;

        info!(
            agents = self.agents.len(),
            obstacles = self.obstacles.len(),
            charging_stations = self.charging_stations.len(),
            missions = self.missions.len(),
            "Environment initialized"
        );
    }

    /// Advance the world by `dt` simulated seconds.
    ///
    /// No-op unless running. Updates every agent (failed ones included),
    /// advances active missions, opportunistically spawns a mission while
    /// below the active cap, and accumulates `simulation_time`.
    pub fn step(&mut self, dt: f64) {
        if !self.running {
            return;
        }

        for agent in &mut self.agents {
            agent.update(dt, self.environment_size, &mut self.rng);
        }

        for mission in &mut self.missions {
            if mission.is_active() {
                let increment = self.rng.random_range(0.0..MISSION_PROGRESS_STEP);
                if mission.advance(increment) {
                    info!(mission = %mission.id(), "Mission completed");
                }
            }
        }

        if self.rng.random_bool(MISSION_SPAWN_PROBABILITY)
            && self.active_mission_count() < ACTIVE_MISSION_CAP
        {
            let mission = self.create_random_mission();
            debug!(mission = %mission.id, "Opportunistic mission spawned");
        }

        self.simulation_time += dt;
    }

    /// Create a mission over the point `(x, y)` at a fixed working
    /// altitude and radius. Returns the created mission's snapshot.
    pub fn create_mission(&mut self, x: f64, y: f64, kind: MissionKind) -> MissionSnapshot {
        let assigned = self.sample_assignment(20, 3, 8);
        let mission = Mission::new(
            self.next_mission_id(),
            kind,
            TargetArea {
                center: Vec3::new(x, y, 5.0),
                radius: 15.0,
            },
            assigned,
            0.0,
        );
        info!(mission = %mission.id(), kind = kind.as_str(), "Mission created");
        let snapshot = mission.snapshot();
        self.missions.push(mission);
        snapshot
    }

    /// Create a mission with a randomized kind, target area, and
    /// assignment. Returns the created mission's snapshot.
    pub fn create_random_mission(&mut self) -> MissionSnapshot {
        let kind = self.random_mission_kind();
        let target_area = self.random_target_area();
        let assigned = self.sample_assignment(30, 2, 6);
        let mission = Mission::new(self.next_mission_id(), kind, target_area, assigned, 0.0);
        let snapshot = mission.snapshot();
        self.missions.push(mission);
        snapshot
    }

    /// Draw a random target area in the inner two thirds of the arena.
    fn random_target_area(&mut self) -> TargetArea {
        let third = self.environment_size / 3.0;
        TargetArea {
            center: Vec3::new(
                self.rng.random_range(-third..third),
                self.rng.random_range(-third..third),
                self.rng.random_range(2.0..8.0),
            ),
            radius: self.rng.random_range(10.0..25.0),
        }
    }

    /// Draw a uniformly random mission kind.
    fn random_mission_kind(&mut self) -> MissionKind {
        match self.rng.random_range(0..4u8) {
            0 => MissionKind::Mapping,
            1 => MissionKind::ObjectDetection,
            2 => MissionKind::DataAggregation,
            _ => MissionKind::FormationControl,
        }
    }

    /// Sample a distinct set of agent ids from the first `pool` roster
    /// slots. The draw count is uniform in `[min_count, max_count]`,
    /// clamped to the pool actually available.
    #[allow(clippy::cast_possible_truncation)]
    fn sample_assignment(&mut self, pool: usize, min_count: usize, max_count: usize) -> Vec<AgentId> {
        let pool = pool.min(self.num_agents);
        let count = self.rng.random_range(min_count..=max_count).min(pool);
        rand::seq::index::sample(&mut self.rng, pool, count)
            .iter()
            .map(|i| AgentId(i as u32))
            .collect()
    }

    /// The id the next created mission will receive.
    fn next_mission_id(&self) -> MissionId {
        MissionId(u32::try_from(self.missions.len()).unwrap_or(u32::MAX))
    }

    /// Aggregate world metrics.
    ///
    /// Never mutates entity state; it only advances the world RNG for the
    /// packet-delivery display placeholder.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn metrics(&mut self) -> Metrics {
        let total = self.agents.len();
        let active = self
            .agents
            .iter()
            .filter(|agent| agent.state().is_active())
            .count();
        let failed = total.saturating_sub(active);
        let average_energy =
            self.agents.iter().map(Agent::energy).sum::<f64>() / total.max(1) as f64;

        let active_missions = self.active_mission_count();
        let completed_missions = self
            .missions
            .iter()
            .filter(|mission| !mission.is_active())
            .count();
        let success_rate = completed_missions as f64 / self.missions.len().max(1) as f64;

        let total_messages: u64 = self
            .agents
            .iter()
            .map(|agent| u64::from(agent.communications()))
            .sum();
        let packet_delivery_rate = self.rng.random_range(0.85..0.98);

        let total_distance: f64 = self.agents.iter().map(Agent::distance_traveled).sum();
        let energy_efficiency = average_energy * active as f64 / total_distance.max(1.0);
        let system_uptime = active as f64 / total.max(1) as f64;

        Metrics {
            simulation_time: round1(self.simulation_time),
            agents: AgentMetrics {
                total: total as u32,
                active: active as u32,
                failed: failed as u32,
                average_energy: round3(average_energy),
            },
            missions: MissionMetrics {
                active: active_missions as u32,
                completed: completed_missions as u32,
                success_rate: round3(success_rate),
            },
            communication: CommunicationMetrics {
                total_messages,
                packet_delivery_rate: round3(packet_delivery_rate),
            },
            performance: PerformanceMetrics {
                energy_efficiency: round3(energy_efficiency),
                system_uptime: round3(system_uptime),
            },
        }
    }

    /// Assemble the full observer payload: serialized agents, obstacles,
    /// stations, active missions only, metrics, and elapsed time.
    pub fn snapshot(&mut self) -> WorldSnapshot {
        let metrics = self.metrics();
        WorldSnapshot {
            agents: self.agents.iter().map(Agent::snapshot).collect(),
            obstacles: self.obstacles.clone(),
            charging_stations: self.charging_stations.clone(),
            active_missions: self
                .missions
                .iter()
                .filter(|mission| mission.is_active())
                .map(Mission::snapshot)
                .collect(),
            metrics,
            simulation_time: self.simulation_time,
        }
    }

    /// Snapshot a single agent.
    pub fn agent(&self, id: AgentId) -> Result<AgentSnapshot, WorldError> {
        self.agents
            .get(id.as_index())
            .map(Agent::snapshot)
            .ok_or(WorldError::AgentNotFound { id })
    }

    /// Apply a partial mutation to one agent, with the same clamping
    /// invariants as the tick update.
    pub fn mutate_agent(
        &mut self,
        id: AgentId,
        patch: &AgentPatch,
    ) -> Result<AgentSnapshot, WorldError> {
        let agent = self
            .agents
            .get_mut(id.as_index())
            .ok_or(WorldError::AgentNotFound { id })?;
        agent.apply_patch(patch);
        Ok(agent.snapshot())
    }

    /// Number of missions still accumulating progress.
    pub fn active_mission_count(&self) -> usize {
        self.missions.iter().filter(|m| m.is_active()).count()
    }

    /// Total missions ever created.
    pub const fn mission_count(&self) -> usize {
        self.missions.len()
    }

    /// Roster size.
    pub const fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Obstacle count for the current environment.
    pub const fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Charging station count for the current environment.
    pub const fn station_count(&self) -> usize {
        self.charging_stations.len()
    }

    /// Side length of the square arena.
    pub const fn environment_size(&self) -> f64 {
        self.environment_size
    }

    /// Simulated seconds elapsed.
    pub const fn simulation_time(&self) -> f64 {
        self.simulation_time
    }

    /// Whether `step` currently advances the world.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Gate or ungate `step`.
    pub const fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}

/// Round to one decimal place (display figures).
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to three decimal places (display figures).
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::arithmetic_side_effects)]
mod tests {
    use swarm_types::PositionPatch;

    use super::*;

    fn test_config(num_agents: usize, environment_size: f64, seed: u64) -> WorldConfig {
        WorldConfig {
            num_agents,
            environment_size,
            seed: Some(seed),
            tick_interval_ms: 16,
        }
    }

    fn make_world() -> World {
        World::new(&test_config(10, 100.0, 42))
    }

    #[test]
    fn initialization_populates_documented_counts() {
        let world = make_world();
        assert_eq!(world.agent_count(), 10);
        assert!((10..=25).contains(&world.obstacle_count()));
        assert_eq!(world.station_count(), 3);
        assert_eq!(world.mission_count(), SEED_MISSION_COUNT);
        assert_eq!(world.simulation_time(), 0.0);
        assert!(!world.is_running());
    }

    #[test]
    fn step_is_a_no_op_while_stopped() {
        let mut world = make_world();
        let before = world.agent(AgentId(0)).unwrap();
        world.step(1.0);
        assert_eq!(world.simulation_time(), 0.0);
        assert_eq!(world.agent(AgentId(0)).unwrap().position, before.position);
    }

    #[test]
    fn horizontal_positions_stay_bounded_over_100_steps() {
        let mut world = make_world();
        world.set_running(true);
        for _ in 0..100 {
            world.step(1.0);
        }
        let snapshot = world.snapshot();
        for agent in &snapshot.agents {
            assert!(agent.position.x.abs() <= 50.0, "x = {}", agent.position.x);
            assert!(agent.position.y.abs() <= 50.0, "y = {}", agent.position.y);
            assert!((0.0..=20.0).contains(&agent.position.z), "z = {}", agent.position.z);
        }
    }

    #[test]
    fn agents_never_teleport_between_consecutive_snapshots() {
        let dt = 1.0;
        let mut world = make_world();
        world.set_running(true);
        let mut prev = world.snapshot();
        for _ in 0..200 {
            world.step(dt);
            let next = world.snapshot();
            for (before, after) in prev.agents.iter().zip(next.agents.iter()) {
                // Per-axis displacement is bounded by the pre-tick speed
                // plus one heading jitter; boundary reflection only ever
                // clamps the integrated point back inside.
                let bound_x = (before.velocity.x.abs() + 0.5) * dt + 1e-9;
                let bound_y = (before.velocity.y.abs() + 0.5) * dt + 1e-9;
                let bound_z = before.velocity.z.abs() * dt + 1e-9;
                assert!((after.position.x - before.position.x).abs() <= bound_x);
                assert!((after.position.y - before.position.y).abs() <= bound_y);
                assert!((after.position.z - before.position.z).abs() <= bound_z);
            }
            prev = next;
        }
    }

    #[test]
    fn simulation_time_accumulates_dt() {
        let mut world = make_world();
        world.set_running(true);
        for _ in 0..100 {
            world.step(0.016);
        }
        assert!((world.simulation_time() - 1.6).abs() < 1e-9);
    }

    #[test]
    fn created_mission_completes_exactly_once() {
        let mut world = make_world();
        world.set_running(true);
        let created = world.create_mission(0.0, 0.0, MissionKind::Mapping);
        assert_eq!(created.status, MissionStatus::Active);
        assert_eq!(created.completion_progress, 0.0);

        let mut transitions = 0u32;
        let mut last_progress = 0.0;
        for _ in 0..10_000 {
            let was_active = world
                .missions
                .get(created.id.as_index())
                .unwrap()
                .is_active();
            world.step(0.016);
            let mission = world.missions.get(created.id.as_index()).unwrap();
            assert!(mission.completion_progress() >= last_progress);
            last_progress = mission.completion_progress();
            if was_active && !mission.is_active() {
                transitions += 1;
            }
        }

        let mission = world.missions.get(created.id.as_index()).unwrap();
        assert!(!mission.is_active(), "mission never completed");
        assert_eq!(transitions, 1);
        assert_eq!(mission.completion_progress(), 1.0);
    }

    #[test]
    fn mission_ids_are_assigned_by_count() {
        let mut world = make_world();
        let a = world.create_mission(0.0, 0.0, MissionKind::Mapping);
        let b = world.create_mission(5.0, 5.0, MissionKind::DataAggregation);
        assert_eq!(a.id, MissionId(3));
        assert_eq!(b.id, MissionId(4));
        assert_eq!(world.mission_count(), 5);
    }

    #[test]
    fn mission_assignment_draws_distinct_known_agents() {
        let mut world = make_world();
        let mission = world.create_mission(0.0, 0.0, MissionKind::Mapping);
        let mut seen = std::collections::BTreeSet::new();
        for id in &mission.assigned_agents {
            assert!(id.as_index() < world.agent_count());
            assert!(seen.insert(*id), "duplicate assignment {id}");
        }
        assert!((3..=8).contains(&mission.assigned_agents.len()));
    }

    #[test]
    fn snapshot_includes_only_active_missions() {
        let mut world = make_world();
        world.set_running(true);
        // Drive long enough for the seed missions to finish.
        for _ in 0..30_000 {
            world.step(0.016);
        }
        let snapshot = world.snapshot();
        for mission in &snapshot.active_missions {
            assert_eq!(mission.status, MissionStatus::Active);
        }
        assert!(snapshot.active_missions.len() <= world.mission_count());
    }

    #[test]
    fn reset_restores_counts_and_clears_time() {
        let mut world = make_world();
        world.set_running(true);
        for _ in 0..50 {
            world.step(0.016);
        }
        assert!(world.simulation_time() > 0.0);

        world.initialize_environment();
        assert_eq!(world.simulation_time(), 0.0);
        assert!(!world.is_running());
        assert_eq!(world.agent_count(), 10);
        assert!((10..=25).contains(&world.obstacle_count()));
        assert_eq!(world.station_count(), 3);
        assert_eq!(world.mission_count(), SEED_MISSION_COUNT);
        for agent in &world.snapshot().agents {
            assert_eq!(agent.performance.distance_traveled, 0.0);
        }
    }

    #[test]
    fn mutate_agent_outside_roster_is_not_found() {
        let mut world = make_world();
        let result = world.mutate_agent(AgentId(999), &AgentPatch::default());
        assert!(matches!(
            result,
            Err(WorldError::AgentNotFound { id: AgentId(999) })
        ));
    }

    #[test]
    fn mutate_agent_clamps_energy_and_moves_position() {
        let mut world = make_world();
        let patch = AgentPatch {
            energy: Some(7.0),
            position: Some(PositionPatch {
                x: Some(1.0),
                y: Some(-2.0),
                z: None,
            }),
        };
        let snapshot = world.mutate_agent(AgentId(0), &patch).unwrap();
        assert_eq!(snapshot.energy.current, 1.0);
        assert_eq!(snapshot.position.x, 1.0);
        assert_eq!(snapshot.position.y, -2.0);
    }

    #[test]
    fn metrics_counts_are_consistent() {
        let mut world = make_world();
        world.set_running(true);
        for _ in 0..200 {
            world.step(0.016);
        }
        let metrics = world.metrics();
        assert_eq!(metrics.agents.total, 10);
        assert_eq!(metrics.agents.active + metrics.agents.failed, 10);
        assert!((0.0..=1.0).contains(&metrics.agents.average_energy));
        assert!((0.0..=1.0).contains(&metrics.missions.success_rate));
        assert!((0.85..=0.98).contains(&metrics.communication.packet_delivery_rate));
        assert!((0.0..=1.0).contains(&metrics.performance.system_uptime));
    }

    #[test]
    fn metrics_does_not_disturb_entity_state() {
        let mut world = make_world();
        let before = world.snapshot().agents;
        let _ = world.metrics();
        let after = world.snapshot().agents;
        assert_eq!(before, after);
    }

    #[test]
    fn same_seed_reproduces_the_same_environment() {
        let mut a = World::new(&test_config(10, 100.0, 7));
        let mut b = World::new(&test_config(10, 100.0, 7));
        assert_eq!(a.snapshot().agents, b.snapshot().agents);
        assert_eq!(a.snapshot().obstacles, b.snapshot().obstacles);

        a.set_running(true);
        b.set_running(true);
        for _ in 0..50 {
            a.step(0.016);
            b.step(0.016);
        }
        assert_eq!(a.snapshot().agents, b.snapshot().agents);
    }
}
