//! Client side of the answer generation service.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2:1b-instruct-q2_K";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// A chat-style text generation backend
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human readable backend name, used in error messages
    fn name(&self) -> &str;

    /// Send one user message to `model` and return the reply text
    async fn chat(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

/// Ollama `/api/chat` client
pub struct OllamaClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client for `base_url` (e.g. `http://localhost:11434`).
    ///
    /// A bare `host:port`, as `OLLAMA_HOST` is often set, gets `http://`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GenerationError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Client(e.to_string()))?;

        Ok(Self {
            base_url,
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl Generator for OllamaClient {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn chat(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let url = self.chat_url();
        let body = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        debug!("POST {} (model={}, prompt {} bytes)", url, model, prompt.len());
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: error_detail(&text),
            });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        extract_content(&json)
    }
}

impl OllamaClient {
    fn transport_error(&self, url: &str, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            GenerationError::Connection {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// Pull the answer text out of a chat response: `{"message": {"content": ...}}`
pub fn extract_content(json: &Value) -> Result<String, GenerationError> {
    json.get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            GenerationError::InvalidResponse("missing string field message.content".to_string())
        })
}

/// Prefer Ollama's `{"error": "..."}` body over the raw text
fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
