//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use branchtale_test_support::{
    FixedClock, PIGS_GAME_ID, StaticGraphLoader, pigs_graph, sample_catalog, three_option_graph,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use branchtale_api::routes;
use branchtale_api::state::AppState;

/// The user every test plays as.
pub const PLAYER: u64 = 42;

/// Build the app state over the sample catalog, with the pigs story and the
/// three-road "fork" story loadable.
pub fn build_test_state() -> AppState {
    let loader = StaticGraphLoader::new()
        .with_game(PIGS_GAME_ID, pigs_graph())
        .with_game("fork", three_option_graph());
    AppState::new(
        sample_catalog(),
        Arc::new(loader),
        Arc::new(FixedClock::default()),
    )
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    routes::router(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Start an adventure as [`PLAYER`] and return the surface handle.
pub async fn start(app: Router, selector: &str) -> String {
    let (status, json) = post_json(
        app,
        "/api/v1/adventures",
        &serde_json::json!({ "user_id": PLAYER, "selector": selector }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "start failed: {json}");
    json["surface"].as_str().unwrap().to_owned()
}

/// React on a surface.
pub async fn react(app: Router, surface: &str, user_id: u64, glyph: &str) -> StatusCode {
    let (status, _) = post_json(
        app,
        &format!("/api/v1/surfaces/{surface}/reactions"),
        &serde_json::json!({ "user_id": user_id, "glyph": glyph }),
    )
    .await;
    status
}

/// Poll a surface until `ready` holds, giving the session tasks time to run.
pub async fn wait_for_surface(
    app: &Router,
    surface: &str,
    ready: impl Fn(&serde_json::Value) -> bool,
) -> serde_json::Value {
    let uri = format!("/api/v1/surfaces/{surface}");
    for _ in 0..100 {
        let (status, json) = get_json(app.clone(), &uri).await;
        if status == StatusCode::OK && ready(&json) {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("surface {surface} never reached the expected state");
}

/// Offered glyphs of a surface view.
pub fn affordances(view: &serde_json::Value) -> Vec<&str> {
    view["affordances"]
        .as_array()
        .unwrap()
        .iter()
        .map(|glyph| glyph.as_str().unwrap())
        .collect()
}
