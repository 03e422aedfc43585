//! Trait definitions for external interactions
//!
//! These traits define the boundary between the extraction core and the
//! model transports. Implementations live in `ecm-llm`.

/// A language-model transport that turns a system + user prompt pair into a
/// single text reply
///
/// Implementations own their own usage counters. A transport performs no
/// retries unless documented otherwise; failures surface immediately.
pub trait ModelTransport {
    /// Error type for transport operations
    type Error;

    /// Short provider identifier (e.g. `cborg`, `openrouter`)
    fn provider_name(&self) -> &str;

    /// Complete a prompt pair
    ///
    /// `model` overrides the transport's default model when given.
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: Option<&str>,
        temperature: f32,
    ) -> Result<String, Self::Error>;
}
