//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use urbansoccer_core::id::UserId;
use urbansoccer_core::repository::OwnerSummary;
use urbansoccer_test_support::{FixedClock, InMemoryStore, StaticIdentityProvider};

use urbansoccer_api::build_router;
use urbansoccer_api::state::AppState;

/// Bearer token of the first test user.
pub const ANA_TOKEN: &str = "ana-session-token";
/// Bearer token of the second test user.
pub const BRUNO_TOKEN: &str = "bruno-session-token";

/// The full router over in-memory storage, with handles on what sits
/// behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
    pub ana: UserId,
    pub bruno: UserId,
}

/// Build the full app router the same way `main.rs` does, with in-memory
/// repositories, a fixed clock and two known users.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::new(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let ana = UserId::generate();
    let bruno = UserId::generate();
    store.add_owner(OwnerSummary {
        id: ana,
        name: "Ana".into(),
        email: "ana@example.com".into(),
    });
    let identity = StaticIdentityProvider::new()
        .with_token(ANA_TOKEN, ana)
        .with_token(BRUNO_TOKEN, bruno);

    let app_state = AppState::new(
        clock.clone(),
        store.clone(),
        store.clone(),
        Arc::new(identity),
    );

    TestApp {
        router: build_router(app_state),
        store,
        clock,
        ana,
        bruno,
    }
}

/// Send a request, optionally authenticated and with a JSON body, and return
/// the status with the parsed body (`Null` when the body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Create an available archetype through the catalog routes and return its id.
pub async fn create_player(app: &Router, name: &str) -> String {
    let body = serde_json::json!({
        "name": name,
        "rarity": "default",
        "stats": { "health": 100, "attack": 15, "defense": 10 },
    });
    let (status, json) = send(app, "POST", "/players", Some(ANA_TOKEN), Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_owned()
}

/// Start a campaign for the holder of `token` and return the response.
pub async fn create_campaign(
    app: &Router,
    token: &str,
    player_id: &str,
) -> (StatusCode, serde_json::Value) {
    let body = serde_json::json!({ "playerId": player_id, "campaignName": "Street Cup" });
    send(app, "POST", "/campaigns", Some(token), Some(&body)).await
}
