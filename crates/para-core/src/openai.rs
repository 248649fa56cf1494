/// Client for OpenAI-compatible chat-completion APIs (Mistral by default).
///
/// Every request carries a bearer token and an explicit timeout. Connection
/// failures, timeouts, 429 and 5xx responses are retried with capped
/// exponential backoff; other failures return immediately.
use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_MODEL: &str = "mistral-small";

#[derive(Clone, Debug)]
pub struct ChatClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_error_body_bytes: usize,
}

impl ChatClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_millis(5_000),
            max_error_body_bytes: 8 * 1024,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} message={message}")]
    Upstream { status: StatusCode, message: String },

    #[error("upstream returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },
}

impl ChatClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }

    /// Upstream HTTP status, when the upstream answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Upstream { status, .. } | Self::UpstreamBody { status, .. } => Some(*status),
            Self::Request(e) => e.status(),
            Self::InvalidJson(_) => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Upstream { status, .. } | Self::UpstreamBody { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::InvalidJson(_) => false,
        }
    }
}

#[derive(Clone)]
pub struct ChatClient {
    config: ChatClientConfig,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, ChatClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("para-core/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatClientError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let url = url.as_str();
        self.request_with_retry(|| async move {
            let resp = self
                .http
                .post(url)
                .bearer_auth(&self.config.api_key)
                .timeout(self.config.timeout)
                .json(request)
                .send()
                .await?;
            self.parse_json_response(resp).await
        })
        .await
    }

    async fn parse_json_response<T: for<'de> Deserialize<'de>>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ChatClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }
        let body = read_limited_text(resp, self.config.max_error_body_bytes).await;
        Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => ChatClientError::Upstream {
                status,
                message: envelope.into_message(),
            },
            Err(_) => ChatClientError::UpstreamBody { status, body },
        })
    }

    async fn request_with_retry<T, Fut, F>(&self, mut f: F) -> Result<T, ChatClientError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ChatClientError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    if attempt > self.config.max_retries || !e.is_retryable() {
                        return Err(e);
                    }
                    let delay = backoff_delay(
                        self.config.initial_backoff,
                        self.config.max_backoff,
                        attempt - 1,
                    );
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "chat completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

fn backoff_delay(initial: Duration, max: Duration, exponent: u32) -> Duration {
    let mult = 1u128.checked_shl(exponent).unwrap_or(u128::MAX);
    let base_ms = initial.as_millis().saturating_mul(mult);
    let capped_ms = std::cmp::min(base_ms, max.as_millis()) as u64;
    let jitter_cap = std::cmp::max(1, capped_ms / 4);
    let jitter_ms = rand::thread_rng().gen_range(0..=jitter_cap);
    Duration::from_millis(capped_ms.saturating_add(jitter_ms))
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}

/// OpenAI nests the message under `error`; Mistral puts it at the top level.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Nested { error: ErrorObject },
    Flat { message: serde_json::Value },
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    message: Option<String>,
}

impl ErrorEnvelope {
    fn into_message(self) -> String {
        match self {
            Self::Nested { error } => error
                .message
                .unwrap_or_else(|| "unknown upstream error".to_string()),
            Self::Flat {
                message: serde_json::Value::String(s),
            } => s,
            Self::Flat { message } => message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: Option<ChatCompletionUsage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub index: Option<u32>,
    pub message: ChatCompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}
