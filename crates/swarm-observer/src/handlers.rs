//! REST endpoint handlers for the Observer server.
//!
//! Command handlers mutate the world through the shared
//! [`Simulation`](swarm_core::Simulation), under the same lock the tick
//! driver uses. Query handlers read snapshots the same way.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | HTML dashboard with live metric tiles |
//! | `POST` | `/api/simulation/start` | Start the tick driver (idempotent) |
//! | `POST` | `/api/simulation/stop` | Stop the tick driver (idempotent) |
//! | `POST` | `/api/simulation/reset` | Stop, join the driver, reinitialize |
//! | `POST` | `/api/mission/create` | Create a mission at a position |
//! | `GET` | `/api/state` | Full world snapshot |
//! | `GET` | `/api/metrics` | Aggregate metrics |
//! | `GET` | `/api/agent/{id}` | Single agent snapshot |
//! | `PUT` | `/api/agent/{id}` | Patch one agent (energy, position) |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use swarm_types::{AgentId, AgentPatch, MissionKind};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Body of the `POST /api/mission/create` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct CreateMissionRequest {
    /// X coordinate of the target center (defaults to 0).
    #[serde(default)]
    pub x: f64,
    /// Y coordinate of the target center (defaults to 0).
    #[serde(default)]
    pub y: f64,
    /// Mission kind wire name (defaults to `mapping`).
    #[serde(rename = "type")]
    pub mission_type: Option<String>,
}

// ---------------------------------------------------------------------------
// GET / -- dashboard
// ---------------------------------------------------------------------------

/// Serve the monitoring dashboard.
///
/// A self-contained HTML page: metric tiles fed by the `WebSocket`
/// stream plus start/stop/reset controls wired to the command
/// endpoints.
pub async fn index() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

// ---------------------------------------------------------------------------
// POST /api/simulation/{start,stop,reset} -- lifecycle commands
// ---------------------------------------------------------------------------

/// Start the simulation driver. Idempotent: a second start while
/// running changes nothing.
pub async fn start_simulation(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let started = state.sim.start().await;
    let message = if started {
        "Simulation started successfully"
    } else {
        "Simulation already running"
    };
    Json(serde_json::json!({
        "status": "started",
        "message": message,
    }))
}

/// Stop the simulation driver. Idempotent. One in-flight tick may
/// complete after this returns.
pub async fn stop_simulation(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.sim.stop().await;
    Json(serde_json::json!({
        "status": "stopped",
        "message": "Simulation stopped successfully",
    }))
}

/// Stop the driver, wait for the in-flight tick, and reinitialize the
/// environment. The simulation stays stopped until started again.
pub async fn reset_simulation(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.sim.reset().await;
    Json(serde_json::json!({
        "status": "reset",
        "message": "Simulation reset successfully",
    }))
}

// ---------------------------------------------------------------------------
// POST /api/mission/create -- mission command
// ---------------------------------------------------------------------------

/// Create a mission centered on `(x, y)` at the standard working
/// altitude.
///
/// Unknown mission types and non-finite coordinates are client errors.
pub async fn create_mission(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateMissionRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    if !request.x.is_finite() || !request.y.is_finite() {
        return Err(ObserverError::InvalidArgument(String::from(
            "mission coordinates must be finite",
        )));
    }
    let kind = request
        .mission_type
        .as_deref()
        .map_or(Ok(MissionKind::Mapping), parse_mission_kind)?;

    let mission = state.sim.create_mission(request.x, request.y, kind).await;

    Ok(Json(serde_json::json!({
        "status": "success",
        "mission": mission,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/state -- full snapshot
// ---------------------------------------------------------------------------

/// Return the full world snapshot, identical in shape to the frames
/// broadcast over the `WebSocket`.
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.sim.state().await;
    Json(serde_json::json!({
        "status": "success",
        "data": snapshot,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/metrics -- aggregate metrics
// ---------------------------------------------------------------------------

/// Return aggregate metrics only.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = state.sim.metrics().await;
    Json(serde_json::json!({
        "status": "success",
        "data": metrics,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/agent/{id} -- single agent
// ---------------------------------------------------------------------------

/// Return a single agent snapshot, or 404 for an id outside the roster.
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse, ObserverError> {
    let agent = state.sim.agent(AgentId(id)).await?;
    Ok(Json(serde_json::json!({
        "status": "success",
        "agent": agent,
    })))
}

// ---------------------------------------------------------------------------
// PUT /api/agent/{id} -- patch one agent
// ---------------------------------------------------------------------------

/// Apply a partial mutation (energy and/or position) to one agent.
///
/// Values are clamped with the same invariants as the tick update;
/// non-finite numbers are rejected before touching the world.
pub async fn put_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(patch): Json<AgentPatch>,
) -> Result<impl IntoResponse, ObserverError> {
    validate_patch(&patch)?;
    let agent = state.sim.mutate_agent(AgentId(id), &patch).await?;
    Ok(Json(serde_json::json!({
        "status": "success",
        "agent": agent,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a mission kind wire name, rejecting unknown values as client
/// errors.
fn parse_mission_kind(name: &str) -> Result<MissionKind, ObserverError> {
    match name {
        "mapping" => Ok(MissionKind::Mapping),
        "object_detection" => Ok(MissionKind::ObjectDetection),
        "data_aggregation" => Ok(MissionKind::DataAggregation),
        "formation_control" => Ok(MissionKind::FormationControl),
        other => Err(ObserverError::InvalidArgument(format!(
            "unknown mission type: {other}"
        ))),
    }
}

/// Reject patches carrying non-finite numbers.
fn validate_patch(patch: &AgentPatch) -> Result<(), ObserverError> {
    if patch.energy.is_some_and(|energy| !energy.is_finite()) {
        return Err(ObserverError::InvalidArgument(String::from(
            "energy must be finite",
        )));
    }
    if let Some(position) = patch.position {
        let finite = position.x.is_none_or(f64::is_finite)
            && position.y.is_none_or(f64::is_finite)
            && position.z.is_none_or(f64::is_finite);
        if !finite {
            return Err(ObserverError::InvalidArgument(String::from(
                "position components must be finite",
            )));
        }
    }
    Ok(())
}

/// The self-contained dashboard page served at `GET /`.
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Swarm OS Observer</title>
    <style>
        body {
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 900px;
            margin: 0 auto;
        }
        h1 { color: #58a6ff; margin-bottom: 0.25rem; }
        .subtitle { color: #8b949e; margin-top: 0; }
        .metric {
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 140px;
        }
        .metric .label { color: #8b949e; font-size: 0.85rem; }
        .metric .value { color: #58a6ff; font-size: 1.5rem; font-weight: bold; }
        button {
            background: #21262d;
            color: #58a6ff;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 0.5rem 1.25rem;
            margin-right: 0.5rem;
            font: inherit;
            cursor: pointer;
        }
        button:hover { background: #30363d; }
        .status { font-weight: bold; }
        .ok { color: #3fb950; }
        .down { color: #f85149; }
        hr { border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }
        a { color: #58a6ff; text-decoration: none; }
        a:hover { text-decoration: underline; }
        ul { list-style: none; padding: 0; }
        li { padding: 0.3rem 0; }
    </style>
</head>
<body>
    <h1>Swarm OS Observer</h1>
    <p class="subtitle">Real-time swarm monitoring and control</p>

    <p>Stream: <span id="ws-status" class="status down">disconnected</span>
       &middot; updates received: <span id="update-count">0</span></p>

    <div>
        <button onclick="command('start')">Start</button>
        <button onclick="command('stop')">Stop</button>
        <button onclick="command('reset')">Reset</button>
    </div>

    <div>
        <div class="metric">
            <div class="label">Simulation time</div>
            <div class="value" id="sim-time">0.0</div>
        </div>
        <div class="metric">
            <div class="label">Active agents</div>
            <div class="value" id="active-agents">0 / 0</div>
        </div>
        <div class="metric">
            <div class="label">Average energy</div>
            <div class="value" id="avg-energy">0%</div>
        </div>
        <div class="metric">
            <div class="label">Active missions</div>
            <div class="value" id="active-missions">0</div>
        </div>
        <div class="metric">
            <div class="label">Packet delivery</div>
            <div class="value" id="packet-delivery">0%</div>
        </div>
        <div class="metric">
            <div class="label">System uptime</div>
            <div class="value" id="system-uptime">0%</div>
        </div>
    </div>

    <hr>

    <h2>API</h2>
    <ul>
        <li><a href="/api/state">GET /api/state</a> -- full world snapshot</li>
        <li><a href="/api/metrics">GET /api/metrics</a> -- aggregate metrics</li>
        <li>GET /api/agent/{id} -- single agent</li>
        <li>PUT /api/agent/{id} -- patch one agent</li>
        <li>POST /api/mission/create -- create a mission</li>
        <li>POST /api/simulation/{start,stop,reset} -- lifecycle</li>
        <li><code>ws://host:port/ws</code> -- live snapshot stream</li>
    </ul>

    <script>
        let updateCount = 0;

        function connect() {
            const proto = location.protocol === 'https:' ? 'wss:' : 'ws:';
            const ws = new WebSocket(proto + '//' + location.host + '/ws');

            ws.onopen = () => {
                const el = document.getElementById('ws-status');
                el.textContent = 'connected';
                el.className = 'status ok';
            };

            ws.onmessage = (event) => {
                const message = JSON.parse(event.data);
                if (message.type === 'state_update' || message.type === 'initial_state') {
                    render(message.data);
                    if (message.type === 'state_update') {
                        updateCount += 1;
                        document.getElementById('update-count').textContent = updateCount;
                    }
                }
            };

            ws.onclose = () => {
                const el = document.getElementById('ws-status');
                el.textContent = 'disconnected';
                el.className = 'status down';
                setTimeout(connect, 3000);
            };
        }

        function render(data) {
            const m = data.metrics;
            document.getElementById('sim-time').textContent = m.simulation_time.toFixed(1);
            document.getElementById('active-agents').textContent =
                m.agents.active + ' / ' + m.agents.total;
            document.getElementById('avg-energy').textContent =
                Math.round(m.agents.average_energy * 100) + '%';
            document.getElementById('active-missions').textContent = m.missions.active;
            document.getElementById('packet-delivery').textContent =
                Math.round(m.communication.packet_delivery_rate * 100) + '%';
            document.getElementById('system-uptime').textContent =
                Math.round(m.performance.system_uptime * 100) + '%';
        }

        async function command(name) {
            await fetch('/api/simulation/' + name, { method: 'POST' });
        }

        connect();
    </script>
</body>
</html>"#;
