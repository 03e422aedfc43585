//! Provider configuration and factory
//!
//! Selects which transport serves a use case (`default`, `extraction`,
//! `chat`) and builds it. Resolution order for a use case:
//!
//! 1. `LLM_PROVIDER_<USE_CASE>` environment variable
//! 2. `<use_case>_provider` in the config
//! 3. `default_provider`

use crate::cborg::CborgProvider;
use crate::openrouter::OpenRouterProvider;
use crate::usage::UsageSnapshot;
use crate::LlmError;
use ecm_domain::traits::ModelTransport;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Supported providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// CBorg (LBL) OpenAI-compatible gateway
    Cborg,
    /// OpenRouter
    OpenRouter,
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cborg" => Ok(ProviderKind::Cborg),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            other => Err(LlmError::Configuration(format!(
                "Unsupported LLM provider: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Cborg => f.write_str("cborg"),
            ProviderKind::OpenRouter => f.write_str("openrouter"),
        }
    }
}

/// Settings for the CBorg provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CborgSettings {
    /// API base URL (without `/v1/...`)
    pub base_url: String,
    /// Model used when a call does not override it
    pub default_model: String,
    /// Inline API key; prefer `api_key_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for CborgSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.cborg.lbl.gov".to_string(),
            default_model: "anthropic/claude-haiku:latest".to_string(),
            api_key: None,
            api_key_env: "CBORG_API_KEY".to_string(),
        }
    }
}

/// Settings for the OpenRouter provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenRouterSettings {
    /// API base URL (including `/api/v1`)
    pub base_url: String,
    /// Model used when a call does not override it
    pub default_model: String,
    /// Inline API key; prefer `api_key_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Sent as `HTTP-Referer`; falls back to `OPENROUTER_SITE_URL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    /// Sent as `X-Title`; falls back to `OPENROUTER_SITE_NAME`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

impl Default for OpenRouterSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            default_model: "anthropic/claude-sonnet-4.5".to_string(),
            api_key: None,
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            referer: None,
            site_name: None,
        }
    }
}

/// Per-provider settings table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// CBorg settings
    pub cborg: CborgSettings,
    /// OpenRouter settings
    pub openrouter: OpenRouterSettings,
}

/// LLM configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider for any use case without a specific override
    pub default_provider: String,
    /// Provider for ECM extraction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_provider: Option<String>,
    /// Provider for free-form chat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_provider: Option<String>,
    /// Provider settings
    pub providers: ProvidersConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            default_provider: "cborg".to_string(),
            extraction_provider: None,
            chat_provider: None,
            providers: ProvidersConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Resolve the provider for a use case, reading the environment override
    pub fn provider_for(&self, use_case: &str) -> Result<ProviderKind, LlmError> {
        let var = format!("LLM_PROVIDER_{}", use_case.to_uppercase());
        let env_override = env::var(var).ok();
        self.resolve_provider(use_case, env_override.as_deref())
    }

    /// Resolve the provider for a use case given an explicit override
    pub fn resolve_provider(
        &self,
        use_case: &str,
        env_override: Option<&str>,
    ) -> Result<ProviderKind, LlmError> {
        if let Some(name) = env_override.filter(|s| !s.trim().is_empty()) {
            return name.parse();
        }

        let specific = match use_case {
            "extraction" => self.extraction_provider.as_deref(),
            "chat" => self.chat_provider.as_deref(),
            _ => None,
        };
        if let Some(name) = specific.filter(|s| !s.trim().is_empty()) {
            return name.parse();
        }

        self.default_provider.parse()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.default_provider
            .parse::<ProviderKind>()
            .map_err(|e| e.to_string())?;
        for name in [&self.extraction_provider, &self.chat_provider]
            .into_iter()
            .flatten()
        {
            name.parse::<ProviderKind>().map_err(|e| e.to_string())?;
        }
        if self.providers.cborg.base_url.is_empty() {
            return Err("providers.cborg.base_url must not be empty".to_string());
        }
        if self.providers.openrouter.base_url.is_empty() {
            return Err("providers.openrouter.base_url must not be empty".to_string());
        }
        Ok(())
    }
}

/// Look up an API key, preferring the inline value
pub(crate) fn resolve_api_key(
    inline: Option<&str>,
    env_var: &str,
    provider_label: &str,
) -> Result<String, LlmError> {
    let key = inline
        .map(str::to_string)
        .or_else(|| env::var(env_var).ok())
        .filter(|k| !k.trim().is_empty());

    key.ok_or_else(|| {
        LlmError::Configuration(format!(
            "{} API key not found. Set {} environment variable or configure api_key.",
            provider_label, env_var
        ))
    })
}

/// A configured transport for one of the supported providers
#[derive(Debug)]
pub enum ProviderClient {
    /// CBorg
    Cborg(CborgProvider),
    /// OpenRouter
    OpenRouter(OpenRouterProvider),
}

impl ProviderClient {
    /// Build the transport for `kind` from its settings
    pub fn from_kind(kind: ProviderKind, config: &LlmConfig) -> Result<Self, LlmError> {
        match kind {
            ProviderKind::Cborg => {
                CborgProvider::from_settings(&config.providers.cborg).map(ProviderClient::Cborg)
            }
            ProviderKind::OpenRouter => {
                OpenRouterProvider::from_settings(&config.providers.openrouter)
                    .map(ProviderClient::OpenRouter)
            }
        }
    }

    /// The provider kind
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderClient::Cborg(_) => ProviderKind::Cborg,
            ProviderClient::OpenRouter(_) => ProviderKind::OpenRouter,
        }
    }

    /// Model used when a call does not override it
    pub fn default_model(&self) -> &str {
        match self {
            ProviderClient::Cborg(p) => p.default_model(),
            ProviderClient::OpenRouter(p) => p.default_model(),
        }
    }

    /// Usage counters of the underlying client
    pub fn usage(&self) -> UsageSnapshot {
        match self {
            ProviderClient::Cborg(p) => p.usage(),
            ProviderClient::OpenRouter(p) => p.usage(),
        }
    }
}

impl ModelTransport for ProviderClient {
    type Error = LlmError;

    fn provider_name(&self) -> &str {
        match self {
            ProviderClient::Cborg(p) => p.provider_name(),
            ProviderClient::OpenRouter(p) => p.provider_name(),
        }
    }

    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: Option<&str>,
        temperature: f32,
    ) -> Result<String, Self::Error> {
        match self {
            ProviderClient::Cborg(p) => p.complete(system_prompt, user_prompt, model, temperature),
            ProviderClient::OpenRouter(p) => {
                p.complete(system_prompt, user_prompt, model, temperature)
            }
        }
    }
}

/// Create the transport configured for a use case
///
/// # Errors
///
/// Returns `LlmError::Configuration` for an unknown provider name or a
/// missing API key. No request is made.
pub fn create_transport(config: &LlmConfig, use_case: &str) -> Result<ProviderClient, LlmError> {
    let kind = config.provider_for(use_case)?;
    ProviderClient::from_kind(kind, config)
}
