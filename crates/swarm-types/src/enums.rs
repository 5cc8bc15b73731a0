//! Enumeration types shared across the simulation and observer surface.
//!
//! Serialized representations are part of the wire contract: agent states
//! and lifecycle statuses serialize lowercase, mission kinds snake_case,
//! matching what the dashboard consumes.

use serde::{Deserialize, Serialize};

/// Behavioral state of a single agent, re-derived fresh on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    /// Stationary with no meaningful horizontal speed.
    Idle,
    /// Traveling under its own velocity.
    Moving,
    /// Executing an assigned task payload.
    Processing,
    /// Exchanging data with peers or the base station.
    Communicating,
    /// Replenishing energy at (or en route to) a charging station.
    Charging,
    /// Out of service. Failed agents keep their roster slot and keep
    /// being updated, but are excluded from active counts.
    Failed,
}

impl AgentState {
    /// Whether the agent counts toward the active roster.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Category of work a mission represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    /// Survey and map a target area.
    Mapping,
    /// Locate and classify objects within a target area.
    ObjectDetection,
    /// Collect and merge sensor data from assigned agents.
    DataAggregation,
    /// Fly a coordinated formation through a target area.
    FormationControl,
}

impl MissionKind {
    /// Wire name of the kind, as used in JSON payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mapping => "mapping",
            Self::ObjectDetection => "object_detection",
            Self::DataAggregation => "data_aggregation",
            Self::FormationControl => "formation_control",
        }
    }
}

/// Lifecycle phase of a mission. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    /// Progress is still accumulating.
    Active,
    /// Progress reached 1.0; never reverts.
    Completed,
}

/// Whether an obstacle holds position or drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Fixed in place for the lifetime of the environment.
    Static,
    /// Moves over time (display classification only).
    Dynamic,
}
