//! Immutable wire-shape views of world state and metrics.
//!
//! These structs define the exact JSON payload broadcast to observers and
//! returned by the state/metrics endpoints. Field names (including the
//! `type` and `mission` renames) are a stability contract with dashboard
//! clients and must not drift.

use serde::{Deserialize, Serialize};

use crate::enums::{AgentState, MissionKind, MissionStatus, ObstacleKind};
use crate::ids::{AgentId, MissionId, ObstacleId, StationId};
use crate::vector::Vec3;

/// Energy block of an agent snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyReadout {
    /// Current charge level in `[0, 1]`.
    pub current: f64,
    /// Power draw in watts.
    pub power_consumption: f64,
    /// Energy harvesting rate in watts.
    pub harvesting_rate: f64,
}

/// Task counters block of an agent snapshot (wire name `mission`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounters {
    /// Number of tasks currently assigned.
    pub assigned_tasks: u32,
    /// Number of tasks completed over the agent's lifetime.
    pub completed_tasks: u32,
}

/// Performance counters block of an agent snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCounters {
    /// Total distance traveled, monotonically non-decreasing.
    pub distance_traveled: f64,
    /// Count of messages exchanged with peers.
    pub communications: u32,
}

/// Immutable serializable view of a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Roster position of the agent.
    pub agent_id: AgentId,
    /// Current position in world coordinates.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    /// Derived behavioral state.
    pub state: AgentState,
    /// Energy level and power figures.
    pub energy: EnergyReadout,
    /// Task counters (serialized under the `mission` key).
    #[serde(rename = "mission")]
    pub tasks: TaskCounters,
    /// Movement and communication counters.
    pub performance: PerformanceCounters,
}

/// A fixed or drifting obstruction in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Obstacle identifier.
    pub id: ObstacleId,
    /// Center position (`z >= 0`).
    pub position: Vec3,
    /// Characteristic size in world units (`> 0`).
    pub size: f64,
    /// Whether the obstacle is static or dynamic.
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
}

/// A ground-level charging station (`position.z == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    /// Station identifier.
    pub id: StationId,
    /// Ground position of the station.
    pub position: Vec3,
    /// Charge delivered per hour of occupancy, in watts.
    pub charging_rate: f64,
    /// Number of agents the station can serve at once (`> 0`).
    pub capacity: u32,
}

/// Spherical region a mission operates over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetArea {
    /// Center of the region.
    pub center: Vec3,
    /// Radius in world units (`> 0`).
    pub radius: f64,
}

/// Immutable serializable view of a single mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSnapshot {
    /// Mission identifier (mission count at creation, never reused).
    pub id: MissionId,
    /// Category of work.
    #[serde(rename = "type")]
    pub kind: MissionKind,
    /// Region the mission operates over.
    pub target_area: TargetArea,
    /// Agents assigned to the mission.
    pub assigned_agents: Vec<AgentId>,
    /// Lifecycle status.
    pub status: MissionStatus,
    /// Completion fraction in `[0, 1]`, monotone while active.
    pub completion_progress: f64,
}

/// Roster-level aggregate figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    /// Total roster size.
    pub total: u32,
    /// Agents not in the failed state.
    pub active: u32,
    /// Agents in the failed state.
    pub failed: u32,
    /// Mean energy level across the roster.
    pub average_energy: f64,
}

/// Mission lifecycle aggregate figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionMetrics {
    /// Missions still accumulating progress.
    pub active: u32,
    /// Missions that reached completion.
    pub completed: u32,
    /// `completed / max(1, total)`.
    pub success_rate: f64,
}

/// Communication aggregate figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommunicationMetrics {
    /// Sum of per-agent communication counters.
    pub total_messages: u64,
    /// Display placeholder; not a modeled protocol figure.
    pub packet_delivery_rate: f64,
}

/// Derived efficiency/uptime ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// `average_energy * active / max(1, total_distance)`.
    pub energy_efficiency: f64,
    /// `active / total` roster fraction.
    pub system_uptime: f64,
}

/// Aggregated world metrics, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Simulated seconds elapsed, rounded to one decimal.
    pub simulation_time: f64,
    /// Roster-level figures.
    pub agents: AgentMetrics,
    /// Mission lifecycle figures.
    pub missions: MissionMetrics,
    /// Communication figures.
    pub communication: CommunicationMetrics,
    /// Derived ratios.
    pub performance: PerformanceMetrics,
}

/// Fully-materialized, immutable view of the world at one instant.
///
/// This is the exact payload broadcast to observers after each tick and
/// returned by the state endpoint. Only active missions are included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// All agents, failed ones included.
    pub agents: Vec<AgentSnapshot>,
    /// All obstacles.
    pub obstacles: Vec<Obstacle>,
    /// All charging stations.
    pub charging_stations: Vec<ChargingStation>,
    /// Missions with status `active` only.
    pub active_missions: Vec<MissionSnapshot>,
    /// Aggregate metrics at snapshot time.
    pub metrics: Metrics,
    /// Simulated seconds elapsed (unrounded).
    pub simulation_time: f64,
}

/// Envelope for messages pushed over the observer `WebSocket`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Full snapshot sent once, immediately after a client connects.
    InitialState(WorldSnapshot),
    /// Full snapshot sent after every completed tick.
    StateUpdate(WorldSnapshot),
}

/// Partial agent mutation payload (`PUT /api/agent/{id}`).
///
/// Absent fields leave the corresponding agent attribute untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentPatch {
    /// Replacement energy level; clamped to `[0, 1]` on application.
    #[serde(default)]
    pub energy: Option<f64>,
    /// Per-axis position overrides.
    #[serde(default)]
    pub position: Option<PositionPatch>,
}

/// Per-axis position override block of an [`AgentPatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionPatch {
    /// New x coordinate, if present.
    #[serde(default)]
    pub x: Option<f64>,
    /// New y coordinate, if present.
    #[serde(default)]
    pub y: Option<f64>,
    /// New z coordinate, if present.
    #[serde(default)]
    pub z: Option<f64>,
}
