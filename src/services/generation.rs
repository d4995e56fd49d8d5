//! Text generation through an OpenAI-compatible chat completions gateway
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::error::{AppError, AppResult};

/// Produces free text for a system instruction and a user message
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Runs one completion and returns the assistant message content
    async fn complete(&self, system: &str, user: &str) -> AppResult<String>;

    /// Generator name for logging
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the chat completions gateway
///
/// One request per call. Nothing is retried: a 429 or 402 is surfaced
/// straight away, since repeating a billed call without backoff only
/// multiplies the charge.
#[derive(Clone)]
pub struct GatewayClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GatewayClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
        }
    }

    fn map_status(status: StatusCode, body: String) -> AppError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => AppError::RateLimited,
            StatusCode::PAYMENT_REQUIRED => AppError::QuotaExceeded,
            _ => AppError::Upstream(format!("gateway returned status {}: {}", status, body)),
        }
    }
}

/// Upstream failures are logged here, once, with their detail
fn upstream(detail: String) -> AppError {
    tracing::error!(detail = %detail, "AI gateway error");
    AppError::Upstream(detail)
}

#[async_trait::async_trait]
impl TextGenerator for GatewayClient {
    async fn complete(&self, system: &str, user: &str) -> AppResult<String> {
        let start = Instant::now();
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    upstream(format!("gateway timed out after {:?}", self.timeout))
                } else {
                    upstream(format!("gateway request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "AI gateway error");
            return Err(Self::map_status(status, body));
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| upstream(format!("malformed gateway response: {}", e)))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| upstream("gateway returned no choices".to_string()))?;

        tracing::debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "AI chat completion"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "gateway"
    }
}
