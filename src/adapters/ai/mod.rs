//! AI adapters - provider implementations and the inference gateway.
//!
//! - [`ChatCompletionsProvider`] - HTTP provider speaking the
//!   OpenAI-compatible chat-completions wire format, parameterized by a
//!   [`ProviderDescriptor`] so one implementation covers every endpoint
//!   in the priority list.
//! - [`MockAIProvider`] - configurable in-process provider for tests.
//! - [`InferenceGateway`] - rate-limited, retrying dispatcher over the
//!   ranked provider list.

mod chat_completions;
mod gateway;
mod mock_provider;

pub use chat_completions::{ChatCompletionsProvider, ProviderDescriptor};
pub use gateway::{GatewayConfig, GatewayError, InferenceGateway};
pub use mock_provider::{MockAIProvider, MockError};
