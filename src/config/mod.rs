//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `GROW_COACH` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use grow_coach::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod engine;
mod error;

pub use ai::AiConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has sensible defaults, so the binary runs with no
/// environment at all (fully offline coaching).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// AI provider configuration (keys, endpoints, retry policy)
    #[serde(default)]
    pub ai: AiConfig,

    /// Dialogue engine configuration (thresholds, seed)
    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GROW_COACH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `GROW_COACH__AI__OPENAI_API_KEY=sk-...` -> `ai.openai_api_key`
    /// - `GROW_COACH__AI__LOCAL_FALLBACK=false` -> `ai.local_fallback`
    /// - `GROW_COACH__ENGINE__RNG_SEED=7` -> `engine.rng_seed`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the
    /// expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GROW_COACH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("GROW_COACH__AI__OPENAI_API_KEY");
        env::remove_var("GROW_COACH__AI__GROQ_API_KEY");
        env::remove_var("GROW_COACH__AI__LOCAL_FALLBACK");
        env::remove_var("GROW_COACH__AI__TIMEOUT_SECS");
        env::remove_var("GROW_COACH__ENGINE__RNG_SEED");
    }

    #[test]
    fn test_load_with_no_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().expect("defaults should load");
        assert!(config.ai.providers().is_empty());
        assert!(config.ai.local_fallback);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_reads_provider_key_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("GROW_COACH__AI__OPENAI_API_KEY", "sk-test");
        let config = AppConfig::load().expect("config should load");
        clear_env();

        assert!(config.ai.has_openai());
        assert_eq!(config.ai.providers().len(), 1);
    }

    #[test]
    fn test_load_reads_nested_engine_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("GROW_COACH__ENGINE__RNG_SEED", "42");
        let config = AppConfig::load().expect("config should load");
        clear_env();

        assert_eq!(config.engine.rng_seed, Some(42));
    }
}
