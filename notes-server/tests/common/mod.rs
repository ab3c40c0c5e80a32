#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use notes_server::{
    AppState, app,
    repository::{MemoryRepository, shared},
};

pub fn build_test_app() -> Router {
    let repo = shared(MemoryRepository::new());
    app(
        AppState::new(&repo),
        &["http://localhost:5194".to_string()],
    )
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Creates a note and returns its JSON representation.
pub async fn create_note(app: &Router, title: &str, content: &str, category: &str, tags: &[&str]) -> Value {
    let response = send(
        app,
        Method::POST,
        "/api/notes",
        Some(serde_json::json!({
            "title": title,
            "content": content,
            "category": category,
            "tags": tags,
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

pub fn ids(notes: &Value) -> Vec<i64> {
    notes
        .as_array()
        .unwrap()
        .iter()
        .map(|note| note["id"].as_i64().unwrap())
        .collect()
}
