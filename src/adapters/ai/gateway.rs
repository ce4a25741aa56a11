//! Inference gateway - rate-limited dispatch over a ranked provider list.
//!
//! One pass walks the providers in priority order, issuing a single HTTP
//! call each; transport and non-2xx failures skip to the next provider.
//! A rate-limit failure aborts the pass instead, and the whole pass is
//! retried with exponential backoff - rate limiting is the only error
//! class that re-enters the loop. When every avenue is exhausted the
//! caller falls back to the local dialogue engine.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::ports::{AIError, AIProvider, CompletionRequest, MessageRole};

/// Gateway dispatch policy.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Minimum gap between outbound dispatches, enforced client-side.
    pub min_request_interval: Duration,
    /// Maximum passes over the provider list when rate limited.
    pub max_attempts: u32,
    /// First backoff delay; doubles on every further attempt.
    pub initial_backoff: Duration,
    /// Tokens requested from providers.
    pub max_tokens: u32,
    /// Sampling temperature sent to providers.
    pub temperature: f32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            min_request_interval: Duration::from_secs(2),
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

/// Gateway failures surfaced to the orchestrator.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Every configured provider failed, or none are configured. The
    /// message carries remediation guidance for when no local fallback
    /// is available.
    #[error(
        "all {attempted} configured provider(s) failed{}; \
         try again shortly or switch to offline mode for local coaching",
        describe_last(.last_error)
    )]
    ProviderExhausted {
        /// Providers configured when the call was made.
        attempted: usize,
        /// The error that ended the final pass, if any call was made.
        last_error: Option<AIError>,
    },
}

fn describe_last(last_error: &Option<AIError>) -> String {
    match last_error {
        Some(err) => format!(" (last error: {err})"),
        None => String::new(),
    }
}

/// Outcome of one pass over the provider list.
struct PassFailure {
    rate_limited: bool,
    last_error: Option<AIError>,
}

/// Stateless dispatcher over the ranked provider list.
///
/// The only process-wide state is the last-dispatch timestamp used for
/// throttling; it sits behind a single-writer async mutex so the
/// interval holds even when multiple sessions share the process.
pub struct InferenceGateway {
    providers: Vec<Arc<dyn AIProvider>>,
    config: GatewayConfig,
    last_dispatch: Mutex<Option<Instant>>,
}

impl InferenceGateway {
    /// Creates a gateway over providers in priority order.
    pub fn new(providers: Vec<Arc<dyn AIProvider>>, config: GatewayConfig) -> Self {
        Self {
            providers,
            config,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Number of configured providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Convenience wrapper: one user utterance under a system prompt.
    pub async fn request_completion(
        &self,
        utterance: &str,
        system_prompt: &str,
    ) -> Result<String, GatewayError> {
        let request = CompletionRequest::new()
            .with_system_prompt(system_prompt)
            .with_message(MessageRole::User, utterance)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);
        self.complete(request).await
    }

    /// Dispatches a completion request under throttle and retry policy.
    pub async fn complete(&self, request: CompletionRequest) -> Result<String, GatewayError> {
        if self.providers.is_empty() {
            debug!("no providers configured, skipping remote attempt");
            return Err(GatewayError::ProviderExhausted {
                attempted: 0,
                last_error: None,
            });
        }

        self.throttle().await;

        let request_id = uuid::Uuid::new_v4();
        let mut attempt: u32 = 0;

        loop {
            match self.provider_pass(&request, request_id).await {
                Ok(content) => return Ok(content),
                Err(failure) if failure.rate_limited && attempt + 1 < self.config.max_attempts => {
                    let delay = self.config.initial_backoff * 2u32.pow(attempt);
                    attempt += 1;
                    info!(
                        %request_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited, backing off before retry"
                    );
                    sleep(delay).await;
                }
                Err(failure) => {
                    return Err(GatewayError::ProviderExhausted {
                        attempted: self.providers.len(),
                        last_error: failure.last_error,
                    });
                }
            }
        }
    }

    /// One ordered walk of the provider list.
    ///
    /// Non-retryable failures skip the provider for this call only; a
    /// rate-limit failure aborts the pass so the outer loop can back off
    /// and start over from the top of the priority list.
    async fn provider_pass(
        &self,
        request: &CompletionRequest,
        request_id: uuid::Uuid,
    ) -> Result<String, PassFailure> {
        let mut last_error = None;

        for provider in &self.providers {
            debug!(%request_id, provider = provider.name(), "dispatching completion");
            match provider.complete(request.clone()).await {
                Ok(response) => {
                    info!(
                        %request_id,
                        provider = provider.name(),
                        model = %response.model,
                        "completion succeeded"
                    );
                    return Ok(response.content);
                }
                Err(err) if err.is_retryable() => {
                    warn!(%request_id, provider = provider.name(), %err, "rate limited");
                    return Err(PassFailure {
                        rate_limited: true,
                        last_error: Some(err),
                    });
                }
                Err(err) => {
                    warn!(
                        %request_id,
                        provider = provider.name(),
                        %err,
                        "provider failed, trying next"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(PassFailure {
            rate_limited: false,
            last_error,
        })
    }

    /// Enforces the minimum interval between dispatches.
    ///
    /// The lock is held across the sleep so concurrent callers serialize
    /// and each observes a correctly spaced slot.
    async fn throttle(&self) {
        let mut last = self.last_dispatch.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.config.min_request_interval {
                let wait = self.config.min_request_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "throttling outbound request");
                sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};

    fn gateway_with(providers: Vec<MockAIProvider>) -> InferenceGateway {
        let providers: Vec<Arc<dyn AIProvider>> = providers
            .into_iter()
            .map(|p| Arc::new(p) as Arc<dyn AIProvider>)
            .collect();
        InferenceGateway::new(providers, GatewayConfig::default())
    }

    #[tokio::test]
    async fn first_provider_success_returns_its_content() {
        let primary = MockAIProvider::new().with_name("fast").with_response("from fast");
        let secondary = MockAIProvider::new().with_name("paid").with_response("from paid");
        let secondary_handle = secondary.clone();

        let gateway = gateway_with(vec![primary, secondary]);
        let content = gateway.request_completion("hello", "coach").await.unwrap();

        assert_eq!(content, "from fast");
        assert_eq!(secondary_handle.call_count(), 0);
    }

    #[tokio::test]
    async fn non_retryable_failure_falls_through_to_next_provider() {
        let primary = MockAIProvider::new()
            .with_name("fast")
            .with_error(MockError::AuthenticationFailed);
        let secondary = MockAIProvider::new().with_name("paid").with_response("from paid");

        let gateway = gateway_with(vec![primary, secondary]);
        let content = gateway.request_completion("hello", "coach").await.unwrap();

        assert_eq!(content, "from paid");
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_retries_same_provider_without_invoking_second() {
        // First provider: 429 twice, then 200. The backoff loop must stay
        // on the priority list head rather than failing over.
        let primary = MockAIProvider::new()
            .with_name("fast")
            .with_error(MockError::RateLimited { retry_after_secs: 1 })
            .with_error(MockError::RateLimited { retry_after_secs: 1 })
            .with_response("recovered");
        let primary_handle = primary.clone();
        let secondary = MockAIProvider::new().with_name("paid").with_response("from paid");
        let secondary_handle = secondary.clone();

        let gateway = gateway_with(vec![primary, secondary]);
        let content = gateway.request_completion("hello", "coach").await.unwrap();

        assert_eq!(content, "recovered");
        assert_eq!(primary_handle.call_count(), 3);
        assert_eq!(secondary_handle.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_bound_is_respected_for_persistent_rate_limiting() {
        let primary = MockAIProvider::new()
            .with_name("fast")
            .with_error(MockError::RateLimited { retry_after_secs: 1 })
            .with_error(MockError::RateLimited { retry_after_secs: 1 })
            .with_error(MockError::RateLimited { retry_after_secs: 1 })
            .with_error(MockError::RateLimited { retry_after_secs: 1 });
        let primary_handle = primary.clone();

        let gateway = gateway_with(vec![primary]);
        let err = gateway.request_completion("hello", "coach").await.unwrap_err();

        // Max attempts, no more.
        assert_eq!(primary_handle.call_count(), 3);
        let GatewayError::ProviderExhausted { attempted, last_error } = err;
        assert_eq!(attempted, 1);
        assert!(matches!(last_error, Some(AIError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn zero_providers_exhausts_without_reaching_network() {
        let gateway = InferenceGateway::new(Vec::new(), GatewayConfig::default());
        let err = gateway.request_completion("hello", "coach").await.unwrap_err();

        let GatewayError::ProviderExhausted { attempted, last_error } = err;
        assert_eq!(attempted, 0);
        assert!(last_error.is_none());
    }

    #[tokio::test]
    async fn all_providers_failing_non_retryably_exhausts_in_one_pass() {
        let primary = MockAIProvider::new()
            .with_name("fast")
            .with_error(MockError::Unavailable {
                message: "down".to_string(),
            });
        let primary_handle = primary.clone();
        let secondary = MockAIProvider::new()
            .with_name("paid")
            .with_error(MockError::MalformedResponse {
                message: "no choices".to_string(),
            });
        let secondary_handle = secondary.clone();

        let gateway = gateway_with(vec![primary, secondary]);
        let err = gateway.request_completion("hello", "coach").await.unwrap_err();

        assert_eq!(primary_handle.call_count(), 1);
        assert_eq!(secondary_handle.call_count(), 1);
        let GatewayError::ProviderExhausted { last_error, .. } = err;
        assert!(matches!(last_error, Some(AIError::MalformedResponse(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_calls_are_spaced_by_the_minimum_interval() {
        let provider = MockAIProvider::new()
            .with_response("one")
            .with_response("two");

        let gateway = gateway_with(vec![provider]);

        let start = Instant::now();
        gateway.request_completion("first", "coach").await.unwrap();
        gateway.request_completion("second", "coach").await.unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed >= Duration::from_secs(2),
            "second dispatch started after only {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn exhausted_error_message_suggests_offline_mode() {
        let gateway = InferenceGateway::new(Vec::new(), GatewayConfig::default());
        let err = gateway.request_completion("hello", "coach").await.unwrap_err();
        assert!(err.to_string().contains("offline mode"));
    }

    #[tokio::test]
    async fn request_carries_system_prompt_and_utterance() {
        let provider = MockAIProvider::new().with_response("ok");
        let handle = provider.clone();

        let gateway = gateway_with(vec![provider]);
        gateway
            .request_completion("I want a new job", "You are a GROW coach")
            .await
            .unwrap();

        let calls = handle.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_prompt.as_deref(), Some("You are a GROW coach"));
        assert_eq!(calls[0].messages[0].content, "I want a new job");
    }
}
