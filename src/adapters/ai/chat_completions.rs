//! HTTP provider speaking the OpenAI-compatible chat-completions format.
//!
//! One implementation serves every entry in the gateway's priority list:
//! each provider is described by a [`ProviderDescriptor`] carrying its
//! endpoint, credential, and model. The wire format is the widely-adopted
//! `{model, messages, max_tokens, temperature}` request with a
//! `{choices: [{message: {content}}]}` response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, MessageRole};

/// Static description of one remote provider.
///
/// Built once from configuration; immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    /// Provider name for logging and fallback reporting.
    pub name: String,
    /// Chat-completions endpoint URL.
    pub endpoint: String,
    /// Bearer credential.
    pub api_key: Secret<String>,
    /// Model identifier sent with every request.
    pub model: String,
}

impl ProviderDescriptor {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            api_key: Secret::new(api_key.into()),
            model: model.into(),
        }
    }
}

/// HTTP chat-completions provider.
pub struct ChatCompletionsProvider {
    descriptor: ProviderDescriptor,
    client: Client,
    timeout: Duration,
}

impl ChatCompletionsProvider {
    /// Creates a provider with the given per-call timeout.
    pub fn new(descriptor: ProviderDescriptor, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            descriptor,
            client,
            timeout,
        }
    }

    /// Converts our request to the wire format.
    fn to_wire_request(&self, request: &CompletionRequest) -> WireRequest {
        let mut messages = Vec::new();

        if let Some(ref prompt) = request.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(WireMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        WireRequest {
            model: self.descriptor.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let wire_request = self.to_wire_request(request);

        self.client
            .post(&self.descriptor.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.descriptor.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Maps response status to the error taxonomy.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = parse_retry_after_header(&response);
        let error_body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => Err(AIError::AuthenticationFailed),
            StatusCode::FORBIDDEN => Err(AIError::Forbidden(error_body)),
            StatusCode::TOO_MANY_REQUESTS => {
                if error_body.contains("insufficient_quota") {
                    Err(AIError::QuotaExceeded(error_body))
                } else {
                    Err(AIError::rate_limited(retry_after.unwrap_or(30)))
                }
            }
            StatusCode::PAYMENT_REQUIRED => Err(AIError::QuotaExceeded(error_body)),
            s if s.is_server_error() => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| AIError::malformed(format!("Failed to parse response: {}", e)))?;

        // Absence of choices[0].message is a malformed response, not a
        // retryable condition.
        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::malformed("No choices in response"))?;
        let message = choice
            .message
            .ok_or_else(|| AIError::malformed("Choice missing message"))?;

        Ok(CompletionResponse {
            content: message.content,
            model: wire_response
                .model
                .unwrap_or_else(|| self.descriptor.model.clone()),
        })
    }
}

fn parse_retry_after_header(response: &Response) -> Option<u32> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
}

#[async_trait]
impl AIProvider for ChatCompletionsProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(&request).await?;
        self.parse_response(response).await
    }

    fn name(&self) -> &str {
        &self.descriptor.name
    }
}

// --- Wire DTOs --------------------------------------------------------------

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: Option<WireMessage>,
}
