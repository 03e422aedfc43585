//! CBorg Provider Implementation
//!
//! CBorg is an OpenAI-compatible gateway; requests go to
//! `{base_url}/v1/chat/completions`.
//!
//! # Examples
//!
//! ```no_run
//! use ecm_llm::CborgProvider;
//! use ecm_domain::traits::ModelTransport;
//!
//! let provider = CborgProvider::new("sk-...", "https://api.cborg.lbl.gov", "anthropic/claude-haiku:latest")?;
//! let reply = provider.complete("You are terse.", "Say hi", None, 0.0)?;
//! println!("{}", reply);
//! # Ok::<(), ecm_llm::LlmError>(())
//! ```

use crate::chat::{ChatClient, ChatMessage};
use crate::config::{resolve_api_key, CborgSettings};
use crate::usage::UsageSnapshot;
use crate::LlmError;
use ecm_domain::traits::ModelTransport;

/// Provider identifier
pub const PROVIDER_NAME: &str = "cborg";

/// CBorg chat-completions transport
#[derive(Debug)]
pub struct CborgProvider {
    client: ChatClient,
}

impl CborgProvider {
    /// Create a provider with an explicit API key
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        default_model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let endpoint = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));
        let client = ChatClient::new(PROVIDER_NAME, endpoint, api_key, default_model)?;
        Ok(Self { client })
    }

    /// Create a provider from settings, reading the key from the environment
    /// when it is not configured inline
    ///
    /// # Errors
    ///
    /// `LlmError::Configuration` when no API key can be found.
    pub fn from_settings(settings: &CborgSettings) -> Result<Self, LlmError> {
        let api_key = resolve_api_key(settings.api_key.as_deref(), &settings.api_key_env, "CBorg")?;
        Self::new(api_key, &settings.base_url, settings.default_model.clone())
    }

    /// Single user-message chat
    pub fn chat(&self, prompt: &str, model: Option<&str>, temperature: f32) -> Result<String, LlmError> {
        self.client
            .chat_completion(&[ChatMessage::user(prompt)], model, temperature, None)
    }

    /// Full chat-completions URL
    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    /// Model used when a call does not override it
    pub fn default_model(&self) -> &str {
        self.client.default_model()
    }

    /// Usage counters so far
    pub fn usage(&self) -> UsageSnapshot {
        self.client.usage()
    }
}

impl ModelTransport for CborgProvider {
    type Error = LlmError;

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: Option<&str>,
        temperature: f32,
    ) -> Result<String, Self::Error> {
        let messages = [ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)];
        self.client.chat_completion(&messages, model, temperature, None)
    }
}
