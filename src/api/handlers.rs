use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    api::types::{ChatRequest, ChatResponse, HealthResponse, SERVICE_NAME},
    api::AppState,
    error::ChatError,
};

const PREVIEW_CHARS: usize = 100;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

pub async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let body = body.map_err(|err| {
        error!(error = %err, "failed to read chat body");
        ChatError::Internal(err.body_text())
    })?;
    let req = parse_request(&body)?;
    let prompt = req.prompt()?;

    info!(prompt = %preview(prompt), "processing prompt");
    if let Some(max_tokens) = &req.max_tokens {
        debug!(%max_tokens, "max_tokens is not forwarded to the CLI");
    }

    let out = state
        .cli
        .run(prompt, req.system.as_deref())
        .await
        .inspect_err(|err| match err {
            ChatError::Timeout => warn!("claude CLI timeout"),
            other => error!(error = %other, "claude CLI invocation failed"),
        })?;

    if !out.success() {
        warn!(returncode = out.status, stderr = %out.stderr, "claude CLI error");
        return Err(ChatError::UpstreamExit {
            stderr: out.stderr,
            returncode: out.status,
        });
    }

    let output = out.stdout.trim().to_string();
    info!(response = %preview(&output), "claude CLI responded");

    Ok(Json(ChatResponse {
        output,
        success: true,
    }))
}

/// Decodes a chat body; only a JSON object qualifies.
fn parse_request(body: &[u8]) -> Result<ChatRequest, ChatError> {
    let invalid = |err: serde_json::Error| {
        debug!(error = %err, "rejecting chat body");
        ChatError::InvalidJson
    };
    let value: Value = serde_json::from_slice(body).map_err(invalid)?;
    if !value.is_object() {
        return Err(ChatError::InvalidJson);
    }
    serde_json::from_value(value).map_err(invalid)
}

pub async fn not_found() -> ChatError {
    ChatError::NotFound
}

/// First [`PREVIEW_CHARS`] characters of `text`, marked when cut.
fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}
