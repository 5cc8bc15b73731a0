//! Observer API server for the Swarm OS simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) streaming a full world snapshot to
//!   every connected observer after each completed tick, preceded by one
//!   `initial_state` message on connect
//! - **Command endpoints** for lifecycle control (start, stop, reset) and
//!   world mutation (mission creation, agent patches)
//! - **Query endpoints** for the full state snapshot, aggregate metrics,
//!   and single agents
//! - **Minimal HTML dashboard** (`GET /`) with live metric tiles fed by
//!   the `WebSocket` stream
//!
//! # Architecture
//!
//! The [`BroadcastHub`] tracks the live observer set. The simulation
//! driver serializes each tick's snapshot exactly once (via [`HubSink`])
//! and the hub fans the frame out with bounded, non-blocking delivery per
//! observer; an observer that stops draining is pruned after the pass,
//! never awaited. Command handlers act on the shared [`Simulation`] and
//! therefore serialize against the tick under the world's single lock.
//!
//! [`Simulation`]: swarm_core::Simulation

pub mod error;
pub mod handlers;
pub mod hub;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ObserverError;
pub use hub::{BroadcastHub, ObserverId};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::{AppState, HubSink};
