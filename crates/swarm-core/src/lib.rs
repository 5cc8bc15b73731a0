//! World state, tick cycle, and simulation lifecycle for Swarm OS.
//!
//! This crate owns the authoritative mutable world and the fixed-cadence
//! driver that advances it:
//!
//! - [`agent`] -- Per-agent kinematics, energy budget, and state derivation.
//! - [`world`] -- The [`World`]: roster, obstacles, stations, missions,
//!   metrics aggregation, and the `step` that advances everything.
//! - [`sim`] -- The [`Simulation`] service: single-lock mutation discipline,
//!   idempotent start, joinable driver task, reset that never races a tick.
//! - [`config`] -- Typed configuration loaded from `swarm-config.yaml`.
//!
//! [`World`]: world::World
//! [`Simulation`]: sim::Simulation

pub mod agent;
pub mod config;
pub mod sim;
pub mod world;

pub use agent::Agent;
pub use config::{ConfigError, ServerSettings, SwarmConfig, WorldConfig};
pub use sim::{FIXED_DT, NoOpSink, Simulation, SnapshotSink};
pub use world::{World, WorldError};
