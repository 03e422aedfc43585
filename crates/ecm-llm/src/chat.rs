//! OpenAI-compatible chat-completions client
//!
//! Both supported providers speak the same wire format; they only differ in
//! endpoint path and a few optional headers. This client does one request per
//! call with a fixed timeout and no retries.

use crate::usage::{UsageSnapshot, UsageStats};
use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Timeout for a single chat-completion request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// One chat message
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

/// Blocking chat-completions client shared by the concrete providers
pub struct ChatClient {
    provider: &'static str,
    endpoint: String,
    api_key: String,
    default_model: String,
    extra_headers: Vec<(String, String)>,
    http: reqwest::blocking::Client,
    usage: UsageStats,
}

impl ChatClient {
    /// Create a client for `endpoint` (the full chat-completions URL)
    pub fn new(
        provider: &'static str,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            provider,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            default_model: default_model.into(),
            extra_headers: Vec::new(),
            http,
            usage: UsageStats::new(),
        })
    }

    /// Send an extra header with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Full chat-completions URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model used when a call does not override it
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Extra headers sent with every request
    pub fn extra_headers(&self) -> &[(String, String)] {
        &self.extra_headers
    }

    /// Usage counters so far
    pub fn usage(&self) -> UsageSnapshot {
        self.usage.snapshot()
    }

    /// Send a chat-completion request and return the reply text
    ///
    /// # Errors
    ///
    /// - `Communication` when the request cannot be sent or returns a non-success status
    /// - `ModelNotAvailable` on HTTP 404
    /// - `RateLimitExceeded` on HTTP 429
    /// - `InvalidResponse` when the body is not a chat-completion payload
    pub fn chat_completion(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String, LlmError> {
        let model = model.unwrap_or(self.default_model.as_str());
        let body = ChatRequest {
            model,
            messages,
            temperature,
            max_tokens,
        };

        debug!(provider = self.provider, model, "sending chat completion");
        let start = Instant::now();

        let mut request = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        for (name, value) in &self.extra_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().map_err(|e| {
            warn!(provider = self.provider, "request failed: {}", e);
            LlmError::Communication(format!("{} request failed: {}", self.provider, e))
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(model.to_string()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }

        let text = response
            .text()
            .map_err(|e| LlmError::Communication(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!(provider = self.provider, %status, "API error - response: {}", text);
            return Err(LlmError::Communication(format!(
                "{} API request failed with HTTP {}: {}",
                self.provider, status, text
            )));
        }

        let elapsed = start.elapsed();
        let (content, usage) = parse_chat_response(&text)?;
        self.usage
            .record(usage.prompt_tokens, usage.completion_tokens, elapsed);

        Ok(content)
    }
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("default_model", &self.default_model)
            .field("extra_headers", &self.extra_headers)
            .finish()
    }
}

fn parse_chat_response(body: &str) -> Result<(String, ChatUsage), LlmError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {}", e)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            LlmError::InvalidResponse(format!("unexpected API response format: {}", body))
        })?;

    Ok((content, parsed.usage.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "[]"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        }"#;
        let (content, usage) = parse_chat_response(body).unwrap();
        assert_eq!(content, "[]");
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 3);
    }

    #[test]
    fn test_parse_chat_response_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "ok"}}]}"#;
        let (content, usage) = parse_chat_response(body).unwrap();
        assert_eq!(content, "ok");
        assert_eq!(usage.prompt_tokens, 0);
    }

    #[test]
    fn test_parse_chat_response_no_choices() {
        let result = parse_chat_response(r#"{"choices": []}"#);
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_chat_response_not_json() {
        let result = parse_chat_response("<html>bad gateway</html>");
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: 0.0,
            max_tokens: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_unreachable_endpoint() {
        let client = ChatClient::new("test", "http://127.0.0.1:9/v1/chat/completions", "key", "m")
            .unwrap();
        let result = client.chat_completion(&[ChatMessage::user("x")], None, 0.0, None);
        assert!(matches!(result, Err(LlmError::Communication(_))));
        assert_eq!(client.usage().chat_invokes, 0);
    }
}
