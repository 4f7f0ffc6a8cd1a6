#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use zeroize::Zeroizing;

use devconnect::{app, config::Config, state::AppState};

/// Builds a router over a fresh in-memory database.
pub async fn test_app() -> (Router, AppState) {
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        token_secret: Zeroizing::new("an-integration-test-secret-of-32+-chars".to_string()),
        port: 0,
        session_duration_days: 5,
        app_env: "development".to_string(),
    };
    let state = AppState::new(&config).await.expect("state init failed");
    (app(state.clone()), state)
}

/// Drives one request through the router and collects the JSON response.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a user and returns the `{token, user}` response body.
pub async fn register(app: &Router, name: &str, email: &str) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "pw1234",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {}", body);
    body
}

pub fn token_of(auth_body: &Value) -> String {
    auth_body["token"].as_str().unwrap().to_string()
}

pub fn user_id_of(auth_body: &Value) -> String {
    auth_body["user"]["id"].as_str().unwrap().to_string()
}
