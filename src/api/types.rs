use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChatError;

pub const SERVICE_NAME: &str = "claude-http-wrapper";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<Value>,
    #[serde(default)]
    pub system: Option<String>,
    /// Accepted in any shape but not forwarded; the CLI has no matching flag.
    #[serde(default)]
    pub max_tokens: Option<Value>,
}

impl ChatRequest {
    /// The prompt text. Absent, null, empty or otherwise falsy values
    /// (`false`, `0`, `[]`, `{}`) are a missing prompt; any other non-string
    /// is not a chat request.
    pub fn prompt(&self) -> Result<&str, ChatError> {
        match &self.prompt {
            Some(Value::String(text)) if !text.is_empty() => Ok(text),
            None | Some(Value::Null) | Some(Value::String(_)) | Some(Value::Bool(false)) => {
                Err(ChatError::MissingPrompt)
            }
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(ChatError::MissingPrompt),
            Some(Value::Array(items)) if items.is_empty() => Err(ChatError::MissingPrompt),
            Some(Value::Object(fields)) if fields.is_empty() => Err(ChatError::MissingPrompt),
            Some(_) => Err(ChatError::InvalidJson),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub output: String,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: &str) -> ChatRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn falsy_prompts_are_missing() {
        for body in [
            r#"{}"#,
            r#"{"prompt":null}"#,
            r#"{"prompt":""}"#,
            r#"{"prompt":false}"#,
            r#"{"prompt":0}"#,
            r#"{"prompt":0.0}"#,
            r#"{"prompt":[]}"#,
            r#"{"prompt":{}}"#,
        ] {
            assert!(
                matches!(request(body).prompt(), Err(ChatError::MissingPrompt)),
                "body: {body}"
            );
        }
    }

    #[test]
    fn truthy_non_string_prompt_is_invalid() {
        for body in [r#"{"prompt":5}"#, r#"{"prompt":true}"#, r#"{"prompt":["a"]}"#] {
            assert!(
                matches!(request(body).prompt(), Err(ChatError::InvalidJson)),
                "body: {body}"
            );
        }
    }

    #[test]
    fn whitespace_prompt_is_kept() {
        assert_eq!(request(r#"{"prompt":"  "}"#).prompt().unwrap(), "  ");
    }

    #[test]
    fn max_tokens_accepts_any_shape() {
        for body in [
            r#"{"prompt":"hi","max_tokens":4096}"#,
            r#"{"prompt":"hi","max_tokens":"4096"}"#,
            r#"{"prompt":"hi","max_tokens":1024.0}"#,
            r#"{"prompt":"hi","max_tokens":-1}"#,
        ] {
            let req = request(body);
            assert!(req.max_tokens.is_some(), "body: {body}");
            assert_eq!(req.prompt().unwrap(), "hi");
        }
    }
}
