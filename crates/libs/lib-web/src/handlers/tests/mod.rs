//! Router-level tests. Every request goes through [`create_router`] backed by
//! a [`MemoryStore`].

use crate::server::{create_router, AppState};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use lib_core::{Config, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

mod booked;

const TEST_SECRET: &str = "handler-test-secret";

/// Create test config
fn test_config() -> Config {
    Config {
        port: 0,
        token_secret: TEST_SECRET.to_string(),
        mongo_uri: "mongodb://unused".to_string(),
        db_name: "go-home-test".to_string(),
        token_expiration_days: 30,
        log_level: "debug".to_string(),
    }
}

/// Full router over a fresh in-memory store.
fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = create_router(AppState::new(store.clone(), test_config()));
    (app, store)
}

/// Send one request and return the status with the body as JSON.
///
/// Non-JSON bodies come back as a JSON string.
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, value)
}

/// Register a user through the API.
async fn register(app: &Router, name: &str, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        Some(json!({
            "name": name,
            "userName": name.to_lowercase(),
            "image": "https://img.example.com/a.png",
            "role": "guest",
            "email": email,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {body}");
    body
}

/// `insertedId` of an insert result.
fn inserted_id(body: &Value) -> String {
    body["insertedId"]
        .as_str()
        .expect("insert result should carry an id")
        .to_string()
}
