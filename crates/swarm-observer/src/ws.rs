//! `WebSocket` handler for real-time snapshot streaming.
//!
//! Clients connect to `GET /ws` and receive a JSON-encoded
//! [`StreamMessage`]: one `initial_state` immediately on connect, then
//! one `state_update` after every completed tick.
//!
//! The channel is read-only from the server's perspective: inbound
//! frames from the observer are discarded (pings are answered, close is
//! honored), never fed into simulation logic. Each socket send runs
//! under a wall-clock timeout so a stalled client is disconnected
//! rather than awaited.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use swarm_types::StreamMessage;
use tracing::{debug, warn};

use crate::state::AppState;

/// Bound on a single socket send before the observer is dropped.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming snapshots.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_observe(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: register with the hub, forward
/// every queued frame to the socket, and deregister on any exit path.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Late joiners start from a full snapshot, delivered on the same
    // queue regular ticks use.
    let initial = StreamMessage::InitialState(state.sim.state().await);
    let initial: Arc<str> = match serde_json::to_string(&initial) {
        Ok(json) => Arc::from(json),
        Err(e) => {
            warn!(error = %e, "failed to serialize initial state, closing socket");
            return;
        }
    };
    let (id, mut rx) = state.hub.register(initial);

    loop {
        tokio::select! {
            // Forward the next queued frame to the client.
            queued = rx.recv() => {
                let Some(frame) = queued else {
                    debug!(observer = %id, "hub dropped this observer, closing socket");
                    break;
                };
                let message = Message::Text(frame.as_ref().into());
                match tokio::time::timeout(SEND_TIMEOUT, socket.send(message)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        debug!(observer = %id, error = %e, "client send failed");
                        break;
                    }
                    Err(_elapsed) => {
                        warn!(observer = %id, "client send timed out");
                        break;
                    }
                }
            }
            // Watch for disconnection; inbound traffic carries no commands.
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(observer = %id, "client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            debug!(observer = %id, "client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(observer = %id, error = %e, "client socket error");
                        break;
                    }
                    _ => {
                        // The stream is one-way; text/binary from the
                        // observer is discarded.
                    }
                }
            }
        }
    }

    state.hub.unregister(id);
}
