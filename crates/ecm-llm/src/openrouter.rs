//! OpenRouter Provider Implementation
//!
//! Requests go to `{base_url}/chat/completions`. The optional site URL and
//! name are forwarded as `HTTP-Referer` and `X-Title` for OpenRouter's
//! attribution.

use crate::chat::{ChatClient, ChatMessage};
use crate::config::{resolve_api_key, OpenRouterSettings};
use crate::usage::UsageSnapshot;
use crate::LlmError;
use ecm_domain::traits::ModelTransport;
use std::env;

/// Provider identifier
pub const PROVIDER_NAME: &str = "openrouter";

/// OpenRouter chat-completions transport
#[derive(Debug)]
pub struct OpenRouterProvider {
    client: ChatClient,
}

impl OpenRouterProvider {
    /// Create a provider with an explicit API key
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        default_model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let client = ChatClient::new(PROVIDER_NAME, endpoint, api_key, default_model)?;
        Ok(Self { client })
    }

    /// Set the `HTTP-Referer` header
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.client = self.client.with_header("HTTP-Referer", referer);
        self
    }

    /// Set the `X-Title` header
    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.client = self.client.with_header("X-Title", site_name);
        self
    }

    /// Create a provider from settings
    ///
    /// The key falls back to the configured environment variable; referer and
    /// site name fall back to `OPENROUTER_SITE_URL` and `OPENROUTER_SITE_NAME`.
    pub fn from_settings(settings: &OpenRouterSettings) -> Result<Self, LlmError> {
        let api_key =
            resolve_api_key(settings.api_key.as_deref(), &settings.api_key_env, "OpenRouter")?;
        let mut provider = Self::new(api_key, &settings.base_url, settings.default_model.clone())?;

        let referer = settings
            .referer
            .clone()
            .or_else(|| env::var("OPENROUTER_SITE_URL").ok());
        if let Some(referer) = referer {
            provider = provider.with_referer(referer);
        }

        let site_name = settings
            .site_name
            .clone()
            .or_else(|| env::var("OPENROUTER_SITE_NAME").ok());
        if let Some(site_name) = site_name {
            provider = provider.with_site_name(site_name);
        }

        Ok(provider)
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

    /// Attribution headers that will be sent
    pub fn headers(&self) -> &[(String, String)] {
        self.client.extra_headers()
    }

    /// Usage counters so far
    pub fn usage(&self) -> UsageSnapshot {
        self.client.usage()
    }
}

impl ModelTransport for OpenRouterProvider {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_construction() {
        let provider = OpenRouterProvider::new("key", "https://openrouter.ai/api/v1", "m").unwrap();
        assert_eq!(provider.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
        assert!(provider.headers().is_empty());
    }

    #[test]
    fn test_attribution_headers() {
        let provider = OpenRouterProvider::new("key", "https://openrouter.ai/api/v1", "m")
            .unwrap()
            .with_referer("https://example.org")
            .with_site_name("ECM Extractor");
        assert_eq!(
            provider.headers(),
            &[
                ("HTTP-Referer".to_string(), "https://example.org".to_string()),
                ("X-Title".to_string(), "ECM Extractor".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_settings_uses_configured_headers() {
        let settings = OpenRouterSettings {
            api_key: Some("key".to_string()),
            referer: Some("https://example.org".to_string()),
            site_name: Some("Audit Lab".to_string()),
            ..OpenRouterSettings::default()
        };
        let provider = OpenRouterProvider::from_settings(&settings).unwrap();
        assert!(provider
            .headers()
            .iter()
            .any(|(k, v)| k == "X-Title" && v == "Audit Lab"));
    }

    #[test]
    fn test_chat_unreachable_endpoint() {
        let provider = OpenRouterProvider::new("key", "http://127.0.0.1:9/api/v1", "m").unwrap();
        let result = provider.chat("hello", None, 0.0);
        assert!(matches!(result, Err(LlmError::Communication(_))));
        assert_eq!(provider.usage().chat_invokes, 0);
    }

    // Integration test (requires OPENROUTER_API_KEY and network)
    #[test]
    #[ignore]
    fn test_openrouter_chat_integration() {
        let provider = OpenRouterProvider::from_settings(&OpenRouterSettings::default()).unwrap();
        let reply = provider.chat("Say 'hello' and nothing else", None, 0.0).unwrap();
        assert!(!reply.is_empty());
        assert_eq!(provider.usage().chat_invokes, 1);
    }
}
