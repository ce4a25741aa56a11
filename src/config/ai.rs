//! AI provider configuration

use std::time::Duration;

use serde::Deserialize;

use crate::adapters::ai::{GatewayConfig, ProviderDescriptor};

use super::error::ValidationError;

/// AI provider configuration.
///
/// Providers are ranked fast/free first, paid second. A missing API key
/// simply removes that provider from the priority list; a gateway with
/// zero providers goes straight to the local engine.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Groq API key (fast/free tier, tried first)
    pub groq_api_key: Option<String>,

    /// Groq chat-completions endpoint
    #[serde(default = "default_groq_endpoint")]
    pub groq_endpoint: String,

    /// Groq model identifier
    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// OpenAI API key (paid, tried second)
    pub openai_api_key: Option<String>,

    /// OpenAI chat-completions endpoint
    #[serde(default = "default_openai_endpoint")]
    pub openai_endpoint: String,

    /// OpenAI model identifier
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Per-call request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum passes over the provider list when rate limited
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum gap between outbound requests, in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Fall back to the local dialogue engine when providers are exhausted
    #[serde(default = "default_local_fallback")]
    pub local_fallback: bool,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Groq is configured
    pub fn has_groq(&self) -> bool {
        self.groq_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Builds the ranked provider descriptor list. Providers without a
    /// key are silently dropped from the priority order.
    pub fn providers(&self) -> Vec<ProviderDescriptor> {
        let mut descriptors = Vec::new();

        if let Some(key) = self.groq_api_key.as_ref().filter(|k| !k.is_empty()) {
            descriptors.push(ProviderDescriptor::new(
                "groq",
                self.groq_endpoint.clone(),
                key.clone(),
                self.groq_model.clone(),
            ));
        }
        if let Some(key) = self.openai_api_key.as_ref().filter(|k| !k.is_empty()) {
            descriptors.push(ProviderDescriptor::new(
                "openai",
                self.openai_endpoint.clone(),
                key.clone(),
                self.openai_model.clone(),
            ));
        }

        descriptors
    }

    /// Gateway policy derived from this configuration.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            min_request_interval: Duration::from_millis(self.min_request_interval_ms),
            max_attempts: self.max_attempts,
            ..GatewayConfig::default()
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidRetries);
        }
        // With no provider keys the session can still run fully offline,
        // but only if fallback is allowed.
        if !self.has_groq() && !self.has_openai() && !self.local_fallback {
            return Err(ValidationError::NoProviderAndNoFallback);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            groq_endpoint: default_groq_endpoint(),
            groq_model: default_groq_model(),
            openai_api_key: None,
            openai_endpoint: default_openai_endpoint(),
            openai_model: default_openai_model(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
            min_request_interval_ms: default_min_interval_ms(),
            local_fallback: default_local_fallback(),
        }
    }
}

fn default_groq_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_groq_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_max_attempts() -> u32 {
    3
}

fn default_min_interval_ms() -> u64 {
    2000
}

fn default_local_fallback() -> bool {
    true
}
