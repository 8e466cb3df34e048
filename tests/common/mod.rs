//! Helpers for driving the router in-process.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use supporter_registry::config::Limits;
use supporter_registry::state::AppState;
use supporter_registry::store::{MemoryKv, SupporterStore};
use supporter_registry::{SUPPORTERS_PATH, app};
use tower::ServiceExt;

/// Router over a fresh in-memory store.
pub fn memory_app(limits: Limits) -> (Router, Arc<MemoryKv>) {
    let kv = Arc::new(MemoryKv::new());
    let store: Arc<dyn SupporterStore> = kv.clone();
    (app(Arc::new(AppState::new(Some(store), limits))), kv)
}

pub fn store_app(store: Arc<dyn SupporterStore>) -> Router {
    app(Arc::new(AppState::new(Some(store), Limits::default())))
}

pub fn unconfigured_app() -> Router {
    app(Arc::new(AppState::new(None, Limits::default())))
}

pub fn get() -> Request<Body> {
    request(Method::GET, Body::empty())
}

pub fn request(method: Method, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(SUPPORTERS_PATH)
        .body(body)
        .unwrap()
}

/// POST from the client `ip` (via `X-Forwarded-For`) with a raw body.
pub fn post_raw(ip: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(SUPPORTERS_PATH)
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post(ip: &str, username: &str) -> Request<Body> {
    post_raw(ip, &serde_json::json!({ "username": username }).to_string())
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Reply {
    pub fn supporters(&self) -> Vec<String> {
        self.body["supporters"]
            .as_array()
            .expect("supporters array")
            .iter()
            .map(|v| v.as_str().expect("string name").to_string())
            .collect()
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> Reply {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        headers,
        body,
    }
}
