//! Integration tests for the Observer API endpoints.
//!
//! Tests drive Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic, routing, and
//! error mapping without a live network connection.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use swarm_core::{NoOpSink, Simulation, WorldConfig};
use swarm_observer::hub::BroadcastHub;
use swarm_observer::router::build_router;
use swarm_observer::state::AppState;
use tower::ServiceExt;

fn make_router() -> Router {
    let config = WorldConfig {
        num_agents: 10,
        environment_size: 100.0,
        seed: Some(42),
        tick_interval_ms: 1,
    };
    let hub = Arc::new(BroadcastHub::new());
    let sim = Arc::new(Simulation::new(&config, Arc::new(NoOpSink)));
    build_router(Arc::new(AppState::new(sim, hub)))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn send_json(router: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn dashboard_serves_html() {
    let router = make_router();
    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("Swarm OS Observer"));
}

#[tokio::test]
async fn state_returns_full_snapshot_shape() {
    let router = make_router();
    let (status, json) = get(&router, "/api/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");

    let data = &json["data"];
    assert_eq!(data["agents"].as_array().unwrap().len(), 10);
    assert_eq!(data["simulation_time"], 0.0);
    assert!(data["obstacles"].as_array().unwrap().len() >= 10);
    assert_eq!(data["charging_stations"].as_array().unwrap().len(), 3);
    assert_eq!(data["active_missions"].as_array().unwrap().len(), 3);

    // Stable wire field names on the first agent.
    let agent = &data["agents"][0];
    assert!(agent["position"]["x"].is_number());
    assert!(agent["energy"]["current"].is_number());
    assert!(agent["mission"]["assigned_tasks"].is_number());
    assert!(agent["performance"]["distance_traveled"].is_number());
}

#[tokio::test]
async fn metrics_reports_roster_figures() {
    let router = make_router();
    let (status, json) = get(&router, "/api/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["agents"]["total"], 10);
    assert!(data["communication"]["packet_delivery_rate"].is_number());
    assert!(data["performance"]["system_uptime"].is_number());
}

#[tokio::test]
async fn get_agent_returns_agent_or_404() {
    let router = make_router();

    let (status, json) = get(&router, "/api/agent/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["agent"]["agent_id"], 0);

    let (status, json) = get(&router, "/api/agent/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn put_agent_applies_clamped_patch() {
    let router = make_router();

    let (status, json) = send_json(
        &router,
        "PUT",
        "/api/agent/0",
        r#"{"energy": 7.0, "position": {"x": 12.5}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["agent"]["energy"]["current"], 1.0);
    assert_eq!(json["agent"]["position"]["x"], 12.5);
}

#[tokio::test]
async fn put_agent_rejects_bad_ids_and_bodies() {
    let router = make_router();

    let (status, _) = send_json(&router, "PUT", "/api/agent/999", r#"{"energy": 0.5}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&router, "PUT", "/api/agent/0", r#"{"energy": "full"}"#).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn create_mission_assigns_the_next_id() {
    let router = make_router();

    let (status, json) = send_json(
        &router,
        "POST",
        "/api/mission/create",
        r#"{"x": 10.0, "y": -5.0, "type": "object_detection"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    // Three seed missions exist, so the first created mission gets id 3.
    assert_eq!(json["mission"]["id"], 3);
    assert_eq!(json["mission"]["type"], "object_detection");
    assert_eq!(json["mission"]["status"], "active");
    assert_eq!(json["mission"]["completion_progress"], 0.0);
    assert_eq!(json["mission"]["target_area"]["center"]["x"], 10.0);
}

#[tokio::test]
async fn create_mission_defaults_to_mapping_at_origin() {
    let router = make_router();
    let (status, json) = send_json(&router, "POST", "/api/mission/create", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mission"]["type"], "mapping");
    assert_eq!(json["mission"]["target_area"]["center"]["x"], 0.0);
}

#[tokio::test]
async fn create_mission_rejects_unknown_types() {
    let router = make_router();
    let (status, json) = send_json(
        &router,
        "POST",
        "/api/mission/create",
        r#"{"type": "terraforming"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("unknown mission type")
    );
}

#[tokio::test]
async fn lifecycle_start_stop_reset_round_trip() {
    let router = make_router();

    let (status, json) = send_json(&router, "POST", "/api/simulation/start", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "started");

    // Let a few ticks run, then stop.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let (status, json) = send_json(&router, "POST", "/api/simulation/stop", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "stopped");

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let (_, json) = get(&router, "/api/state").await;
    let after_stop = json["data"]["simulation_time"].as_f64().unwrap();
    assert!(after_stop > 0.0);

    // Reset wipes time and leaves the simulation stopped.
    let (status, json) = send_json(&router, "POST", "/api/simulation/reset", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "reset");

    let (_, json) = get(&router, "/api/state").await;
    assert_eq!(json["data"]["simulation_time"], 0.0);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let (_, json) = get(&router, "/api/state").await;
    assert_eq!(json["data"]["simulation_time"], 0.0);
}

#[tokio::test]
async fn start_is_idempotent_over_http() {
    let router = make_router();

    let (_, first) = send_json(&router, "POST", "/api/simulation/start", "").await;
    assert_eq!(first["message"], "Simulation started successfully");

    let (status, second) = send_json(&router, "POST", "/api/simulation/start", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["message"], "Simulation already running");

    let _ = send_json(&router, "POST", "/api/simulation/stop", "").await;
}
