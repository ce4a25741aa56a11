//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No AI provider configured and local fallback is disabled")]
    NoProviderAndNoFallback,

    #[error("Request timeout must be greater than zero")]
    InvalidTimeout,

    #[error("Retry attempts must be greater than zero")]
    InvalidRetries,
}
