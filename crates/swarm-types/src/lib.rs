//! Shared type definitions for the Swarm OS simulation.
//!
//! This crate is the single source of truth for all types that cross the
//! boundary between the simulation core and the observer surface. The
//! snapshot structs defined here serialize to the exact JSON shape the
//! dashboard and API clients consume, so field names and renames in this
//! crate are load-bearing compatibility contracts.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe index wrappers for entity identifiers
//! - [`enums`] -- Enumeration types (agent state, mission kind/status, obstacles)
//! - [`vector`] -- The [`Vec3`] 3D point/velocity primitive
//! - [`snapshots`] -- Immutable wire-shape views of world state and metrics

pub mod enums;
pub mod ids;
pub mod snapshots;
pub mod vector;

// Re-export all public types at crate root for convenience.
pub use enums::{AgentState, MissionKind, MissionStatus, ObstacleKind};
pub use ids::{AgentId, MissionId, ObstacleId, StationId};
pub use snapshots::{
    AgentMetrics, AgentPatch, AgentSnapshot, ChargingStation, CommunicationMetrics, EnergyReadout,
    Metrics, MissionMetrics, MissionSnapshot, Obstacle, PerformanceCounters, PerformanceMetrics,
    PositionPatch, StreamMessage, TargetArea, TaskCounters, WorldSnapshot,
};
pub use vector::Vec3;
