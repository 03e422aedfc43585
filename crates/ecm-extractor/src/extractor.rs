//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_reply;
use crate::prompt::{PromptBuilder, SYSTEM_PROMPT};
use crate::schema::record_schema;
use crate::types::{ElementFailure, ExtractionMetadata, ExtractionRequest, ExtractionResult};
use ecm_domain::traits::ModelTransport;
use ecm_domain::EcmRecord;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::time::timeout;
use tracing::{debug, info};

/// The Extractor turns document text into validated ECM records
///
/// Each call is independent: prompt, one model call, parse, validate. The
/// only shared state is the transport's own usage counters.
pub struct Extractor<T>
where
    T: ModelTransport,
{
    transport: Arc<T>,
    config: ExtractorConfig,
    schema: Value,
}

impl<T> Extractor<T>
where
    T: ModelTransport + Send + Sync + 'static,
    T::Error: Display,
{
    /// Create a new Extractor
    pub fn new(transport: T, config: ExtractorConfig) -> Self {
        Self::from_arc(Arc::new(transport), config)
    }

    /// Create an Extractor over a shared transport
    pub fn from_arc(transport: Arc<T>, config: ExtractorConfig) -> Self {
        Self {
            transport,
            config,
            schema: record_schema(),
        }
    }

    /// Create an Extractor, rejecting an invalid configuration
    pub fn try_new(transport: T, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self::new(transport, config))
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The user prompt that `extract` would send for `request`
    pub fn prompt_for(&self, request: &ExtractionRequest) -> String {
        PromptBuilder::new(&request.text, &self.schema)
            .with_source_name(&request.source_id)
            .build()
    }

    /// Extract ECM records from one document
    ///
    /// Empty or whitespace-only text returns an empty result without calling
    /// the model.
    ///
    /// # Errors
    ///
    /// - [`ExtractorError::Transport`] when the model call fails
    /// - [`ExtractorError::Timeout`] when it exceeds the configured timeout
    /// - [`ExtractorError::MalformedResponse`] when the reply is not JSON
    pub async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractorError> {
        let start_time = Instant::now();
        let model = request
            .model
            .clone()
            .or_else(|| self.config.default_model.clone());

        if request.text.trim().is_empty() {
            info!("Empty document '{}', skipping model call", request.source_id);
            return Ok(self.finish(request, model, start_time, Vec::new(), Vec::new(), 0));
        }

        info!(
            "Starting extraction for source '{}', text length {}",
            request.source_id,
            request.text.len()
        );

        let prompt = self.prompt_for(&request);
        debug!("Prompt length: {} chars", prompt.len());

        let reply = timeout(
            self.config.extraction_timeout(),
            self.call_model(prompt, model.clone()),
        )
        .await
        .map_err(|_| ExtractorError::Timeout(self.config.extraction_timeout_secs))??;

        debug!("LLM response length: {} chars", reply.len());

        let batch = parse_reply(&reply, &self.config.validation_options())?;

        info!(
            "Extraction complete: {} attempted, {} validated",
            batch.elements_attempted,
            batch.records.len()
        );

        Ok(self.finish(
            request,
            model,
            start_time,
            batch.records,
            batch.failures,
            batch.elements_attempted,
        ))
    }

    /// Extract and keep only the validated records
    pub async fn extract_text(&self, text: &str) -> Result<Vec<EcmRecord>, ExtractorError> {
        let request = ExtractionRequest::new(text, "");
        Ok(self.extract(request).await?.records)
    }

    fn finish(
        &self,
        request: ExtractionRequest,
        model: Option<String>,
        start_time: Instant,
        records: Vec<EcmRecord>,
        failures: Vec<ElementFailure>,
        elements_attempted: usize,
    ) -> ExtractionResult {
        let metadata = ExtractionMetadata {
            source_id: request.source_id.clone(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            provider: self.transport.provider_name().to_string(),
            model,
            elements_attempted,
            records_validated: records.len(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        ExtractionResult {
            records,
            failures,
            source_text: request.text,
            source_id: request.source_id,
            metadata,
        }
    }

    /// Call the transport on the blocking pool
    async fn call_model(
        &self,
        prompt: String,
        model: Option<String>,
    ) -> Result<String, ExtractorError> {
        let transport = Arc::clone(&self.transport);
        let temperature = self.config.temperature;

        // ModelTransport is synchronous
        tokio::task::spawn_blocking(move || {
            transport
                .complete(SYSTEM_PROMPT, &prompt, model.as_deref(), temperature)
                .map_err(|e| ExtractorError::Transport(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Transport(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecm_llm::MockProvider;
    use std::fmt;

    fn create_test_extractor(reply: &str) -> Extractor<MockProvider> {
        Extractor::new(MockProvider::new(reply), ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_extract_empty_response() {
        let extractor = create_test_extractor("[]");
        let result = extractor
            .extract(ExtractionRequest::new("Some text", "test_source"))
            .await
            .unwrap();
        assert_eq!(result.record_count(), 0);
        assert_eq!(result.metadata.provider, "mock");
        assert_eq!(result.source_text, "Some text");
    }

    #[tokio::test]
    async fn test_default_model_from_config() {
        let config = ExtractorConfig {
            default_model: Some("config-model".to_string()),
            temperature: 0.3,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(MockProvider::new("[]"), config);
        let result = extractor
            .extract(ExtractionRequest::new("text", "doc"))
            .await
            .unwrap();

        assert_eq!(extractor.transport().last_model().as_deref(), Some("config-model"));
        assert_eq!(extractor.transport().last_temperature(), Some(0.3));
        assert_eq!(result.metadata.model.as_deref(), Some("config-model"));
    }

    #[tokio::test]
    async fn test_extracted_by_default_applied() {
        let extractor = create_test_extractor(
            r#"[{"submission_metadata": {"source_filename": "a.pdf"}, "ecm_detail": {"name": "LED"}}]"#,
        );
        let records = extractor.extract_text("text").await.unwrap();
        let submission = records[0].submission_metadata.as_ref().unwrap();
        assert_eq!(submission.extracted_by.as_deref(), Some("ECM Extractor"));
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let config = ExtractorConfig {
            extraction_timeout_secs: 0,
            ..ExtractorConfig::default()
        };
        let result = Extractor::try_new(MockProvider::default(), config);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_prompt_for_names_source() {
        let extractor = create_test_extractor("[]");
        let prompt = extractor.prompt_for(&ExtractionRequest::new("body", "audit.pdf"));
        assert!(prompt.contains("SOURCE DOCUMENT: audit.pdf"));
        assert!(prompt.contains("body"));
    }

    #[derive(Debug)]
    struct SlowError;

    impl fmt::Display for SlowError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("slow")
        }
    }

    struct SlowTransport;

    impl ModelTransport for SlowTransport {
        type Error = SlowError;

        fn provider_name(&self) -> &str {
            "slow"
        }

        fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _model: Option<&str>,
            _temperature: f32,
        ) -> Result<String, Self::Error> {
            std::thread::sleep(std::time::Duration::from_millis(1500));
            Ok("[]".to_string())
        }
    }

    #[tokio::test]
    async fn test_timeout_is_fatal() {
        let config = ExtractorConfig {
            extraction_timeout_secs: 1,
            ..ExtractorConfig::default()
        };
        let extractor = Extractor::new(SlowTransport, config);
        let result = extractor.extract(ExtractionRequest::new("text", "doc")).await;
        assert!(matches!(result, Err(ExtractorError::Timeout(1))));
    }
}
