//! Failure kinds of a wrapper request and their HTTP mapping.
//!
//! Handlers return `Result<T, ChatError>`; [`IntoResponse`] is the one
//! place that decides the status code and JSON body for each kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Request body was not JSON, or not a chat request.
    #[error("Invalid JSON")]
    InvalidJson,

    /// `prompt` absent, null or empty.
    #[error("Missing prompt")]
    MissingPrompt,

    /// The CLI ran and exited non-zero.
    #[error("Claude CLI error")]
    UpstreamExit { stderr: String, returncode: i32 },

    /// The CLI could not be spawned: not on PATH or not executable.
    #[error("Claude CLI not found. Is it installed and in PATH?")]
    BinaryNotFound,

    #[error("Claude CLI timeout")]
    Timeout,

    #[error("{0}")]
    Internal(String),

    /// No route for the path/method pair.
    #[error("Not found")]
    NotFound,
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::InvalidJson | ChatError::MissingPrompt => StatusCode::BAD_REQUEST,
            ChatError::UpstreamExit { .. }
            | ChatError::BinaryNotFound
            | ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ChatError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ChatError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<std::io::Error> for ChatError {
    fn from(e: std::io::Error) -> Self {
        ChatError::Internal(e.to_string())
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ChatError::UpstreamExit { stderr, returncode } => json!({
                "error": self.to_string(),
                "stderr": stderr,
                "returncode": returncode,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
