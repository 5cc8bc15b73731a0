//! Single simulated unit: kinematics, energy budget, and derived state.
//!
//! Each agent owns its own physics step. Movement is a random walk with
//! momentum inside a bounded arena: horizontal axes reflect off the walls
//! with energy loss, the vertical axis is clamped between the ground and a
//! fixed altitude cap. Energy drains or charges according to the agent's
//! power figures, and the behavioral state is re-derived from energy and
//! speed on every tick -- it is never sticky.

use rand::Rng;
use swarm_types::{
    AgentId, AgentPatch, AgentSnapshot, AgentState, EnergyReadout, PerformanceCounters,
    TaskCounters, Vec3,
};

/// Altitude ceiling in world units; agents fly in `[0, ALTITUDE_CAP]`.
pub const ALTITUDE_CAP: f64 = 20.0;

/// Velocity retained after reflecting off a horizontal boundary.
const BOUNDARY_RESTITUTION: f64 = 0.8;

/// Per-tick probability of a random heading change.
const HEADING_JITTER_PROBABILITY: f64 = 0.1;

/// Magnitude bound of a single heading jitter, per horizontal axis.
const HEADING_JITTER_BOUND: f64 = 0.5;

/// Combined horizontal speed below which an agent reads as idle.
const IDLE_SPEED_THRESHOLD: f64 = 0.1;

/// Energy level below which an agent is critically drained.
const CRITICAL_ENERGY: f64 = 0.1;

/// Energy level below which an agent heads for a charger.
const LOW_ENERGY: f64 = 0.3;

/// Probability that a critically drained agent reaches a charger
/// instead of failing, evaluated each tick.
const CRITICAL_RECOVERY_PROBABILITY: f64 = 0.3;

/// A single simulated unit.
///
/// Created once at environment initialization and never destroyed; the
/// roster is replaced wholesale on reset. All mutation happens through
/// [`update`](Self::update) and [`apply_patch`](Self::apply_patch);
/// external readers only ever see [`AgentSnapshot`] copies.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Roster position.
    id: AgentId,
    /// Current position in world coordinates.
    position: Vec3,
    /// Current velocity.
    velocity: Vec3,
    /// Derived behavioral state.
    state: AgentState,
    /// Charge level, always clamped to `[0, 1]`.
    energy: f64,
    /// Power draw in watts.
    power_consumption: f64,
    /// Energy harvesting rate in watts.
    harvesting_rate: f64,
    /// Tasks currently assigned.
    assigned_tasks: u32,
    /// Tasks completed over the agent's lifetime.
    completed_tasks: u32,
    /// Messages exchanged with peers.
    communications: u32,
    /// Total distance traveled; monotonically non-decreasing.
    distance_traveled: f64,
}

impl Agent {
    /// Create an agent at `position` with randomized starting attributes.
    pub fn spawn(id: AgentId, position: Vec3, rng: &mut impl Rng) -> Self {
        Self {
            id,
            position,
            velocity: Vec3::new(
                rng.random_range(-2.0..2.0),
                rng.random_range(-2.0..2.0),
                rng.random_range(-0.5..0.5),
            ),
            state: AgentState::Moving,
            energy: rng.random_range(0.3..1.0),
            power_consumption: rng.random_range(10.0..50.0),
            harvesting_rate: rng.random_range(5.0..25.0),
            assigned_tasks: rng.random_range(0..=3),
            completed_tasks: rng.random_range(0..=10),
            communications: 0,
            distance_traveled: 0.0,
        }
    }

    /// Advance kinematics and energy by `dt` simulated seconds.
    ///
    /// Mutates position, velocity, state, energy, and the distance
    /// accumulator in place. Total by construction: every output is
    /// clamped to its valid range, so a tick can never fail here.
    pub fn update(&mut self, dt: f64, environment_size: f64, rng: &mut impl Rng) {
        let prev = self.position;

        // Random walk with momentum: occasional bounded heading change.
        if rng.random_bool(HEADING_JITTER_PROBABILITY) {
            self.velocity.x += rng.random_range(-HEADING_JITTER_BOUND..HEADING_JITTER_BOUND);
            self.velocity.y += rng.random_range(-HEADING_JITTER_BOUND..HEADING_JITTER_BOUND);
        }

        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;
        self.position.z += self.velocity.z * dt;

        // Horizontal walls reflect with energy loss; position clamps to
        // the wall it crossed.
        let half = environment_size / 2.0;
        if self.position.x.abs() > half {
            self.velocity.x *= -BOUNDARY_RESTITUTION;
            self.position.x = half.copysign(self.position.x);
        }
        if self.position.y.abs() > half {
            self.velocity.y *= -BOUNDARY_RESTITUTION;
            self.position.y = half.copysign(self.position.y);
        }

        // Vertical axis floors at the ground and ceilings at the altitude
        // cap; velocity is forced back into range at either bound.
        if self.position.z < 0.0 {
            self.position.z = 0.0;
            self.velocity.z = self.velocity.z.abs();
        } else if self.position.z > ALTITUDE_CAP {
            self.position.z = ALTITUDE_CAP;
            self.velocity.z = -self.velocity.z.abs();
        }

        self.distance_traveled += prev.distance_to(self.position);

        // Net charge/drain; the divisors are a fixed unit conversion.
        let energy_change = (self.harvesting_rate - self.power_consumption) * dt / 3600.0;
        self.energy = (self.energy + energy_change / 100.0).clamp(0.0, 1.0);

        self.state = self.derive_state(rng);
    }

    /// Derive the behavioral state from energy and speed, in priority order.
    fn derive_state(&self, rng: &mut impl Rng) -> AgentState {
        if self.energy < CRITICAL_ENERGY {
            if rng.random_bool(CRITICAL_RECOVERY_PROBABILITY) {
                AgentState::Charging
            } else {
                AgentState::Failed
            }
        } else if self.energy < LOW_ENERGY {
            AgentState::Charging
        } else if self.velocity.x.abs() + self.velocity.y.abs() > IDLE_SPEED_THRESHOLD {
            AgentState::Moving
        } else {
            AgentState::Idle
        }
    }

    /// Apply a partial mutation, preserving the same clamping invariants
    /// as [`update`](Self::update). Callers validate finiteness.
    pub fn apply_patch(&mut self, patch: &AgentPatch) {
        if let Some(energy) = patch.energy {
            self.energy = energy.clamp(0.0, 1.0);
        }
        if let Some(position) = patch.position {
            if let Some(x) = position.x {
                self.position.x = x;
            }
            if let Some(y) = position.y {
                self.position.y = y;
            }
            if let Some(z) = position.z {
                self.position.z = z;
            }
        }
    }

    /// Immutable serializable view of the agent.
    pub const fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            agent_id: self.id,
            position: self.position,
            velocity: self.velocity,
            state: self.state,
            energy: EnergyReadout {
                current: self.energy,
                power_consumption: self.power_consumption,
                harvesting_rate: self.harvesting_rate,
            },
            tasks: TaskCounters {
                assigned_tasks: self.assigned_tasks,
                completed_tasks: self.completed_tasks,
            },
            performance: PerformanceCounters {
                distance_traveled: self.distance_traveled,
                communications: self.communications,
            },
        }
    }

    /// Roster position of the agent.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Current derived state.
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Current charge level in `[0, 1]`.
    pub const fn energy(&self) -> f64 {
        self.energy
    }

    /// Current position.
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Total distance traveled so far.
    pub const fn distance_traveled(&self) -> f64 {
        self.distance_traveled
    }

    /// Communication counter.
    pub const fn communications(&self) -> u32 {
        self.communications
    }
}
