#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use claude_http_wrapper::api::{router, AppState};
use claude_http_wrapper::ClaudeCli;

pub fn app(program: impl Into<PathBuf>, timeout: Duration) -> Router {
    router(AppState::new(ClaudeCli::new(program, timeout)))
}

/// Writes an executable `/bin/sh` script standing in for the Claude CLI.
#[cfg(unix)]
pub fn stub(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub fn post_chat(body: impl Into<Body>) -> Request<Body> {
    Request::post("/chat")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body)
}

pub async fn send_json(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let (status, headers, body) = send(app, req).await;
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", String::from_utf8_lossy(&body)));
    (status, headers, json)
}

pub fn assert_cors(headers: &HeaderMap) {
    let header = |name: &str| {
        headers
            .get(name)
            .unwrap_or_else(|| panic!("missing {name}"))
            .to_str()
            .unwrap()
            .to_ascii_lowercase()
    };

    assert_eq!(header("access-control-allow-origin"), "*");
    let methods = header("access-control-allow-methods");
    for method in ["get", "post", "options"] {
        assert!(methods.contains(method), "methods: {methods}");
    }
    assert!(header("access-control-allow-headers").contains("content-type"));
}
