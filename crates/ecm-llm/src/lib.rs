//! ECM LLM Provider Layer
//!
//! Model-transport implementations of the `ModelTransport` trait from
//! `ecm-domain`. Every transport takes a system + user prompt pair and
//! returns one text reply.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `CborgProvider`: CBorg OpenAI-compatible gateway
//! - `OpenRouterProvider`: OpenRouter
//!
//! `create_transport` picks one of the real providers from an `LlmConfig`.
//!
//! # Examples
//!
//! ```
//! use ecm_llm::MockProvider;
//! use ecm_domain::traits::ModelTransport;
//!
//! let provider = MockProvider::new("[]");
//! let reply = provider.complete("system", "user", None, 0.0).unwrap();
//! assert_eq!(reply, "[]");
//! ```

#![warn(missing_docs)]

pub mod cborg;
pub mod chat;
pub mod config;
pub mod openrouter;
pub mod usage;

use ecm_domain::traits::ModelTransport;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use cborg::CborgProvider;
pub use chat::{ChatClient, ChatMessage};
pub use config::{
    create_transport, CborgSettings, LlmConfig, OpenRouterSettings, ProviderClient, ProviderKind,
    ProvidersConfig,
};
pub use openrouter::OpenRouterProvider;
pub use usage::{UsageSnapshot, UsageStats};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Missing credential or unusable provider configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured replies without making any network calls. Replies
/// are keyed by the exact user prompt; anything else gets the default reply.
///
/// # Examples
///
/// ```
/// use ecm_llm::MockProvider;
/// use ecm_domain::traits::ModelTransport;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.complete("sys", "prompt1", None, 0.0).unwrap(), "response1");
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    call_count: usize,
    last_model: Option<String>,
    last_temperature: Option<f32>,
    fail_all: Option<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed reply for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a provider whose every call fails with `LlmError::Communication`
    pub fn failing(message: impl Into<String>) -> Self {
        let provider = Self::default();
        lock(&provider.state).fail_all = Some(message.into());
        provider
    }

    /// Add a specific reply for a given user prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), Ok(response.into()));
    }

    /// Configure to return an error for a specific user prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), Err("Mock error".to_string()));
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        lock(&self.state).call_count
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        lock(&self.state).call_count = 0;
    }

    /// Model override seen on the last call
    pub fn last_model(&self) -> Option<String> {
        lock(&self.state).last_model.clone()
    }

    /// Temperature seen on the last call
    pub fn last_temperature(&self) -> Option<f32> {
        lock(&self.state).last_temperature
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl ModelTransport for MockProvider {
    type Error = LlmError;

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn complete(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        model: Option<&str>,
        temperature: f32,
    ) -> Result<String, Self::Error> {
        {
            let mut state = lock(&self.state);
            state.call_count += 1;
            state.last_model = model.map(str::to_string);
            state.last_temperature = Some(temperature);
            if let Some(message) = &state.fail_all {
                return Err(LlmError::Communication(message.clone()));
            }
        }

        match lock(&self.responses).get(user_prompt) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(LlmError::Other(message.clone())),
            None => Ok(self.default_response.clone()),
        }
    }
}
