//! Error types for the Extractor

use thiserror::Error;

/// Errors that abort a whole extraction
///
/// Per-element validation problems are not errors; they are reported in
/// [`crate::ExtractionResult::failures`].
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The model call itself failed
    #[error("ECM extraction failed: {0}")]
    Transport(String),

    /// The recovered reply is not JSON at all
    #[error("Failed to parse LLM response as JSON: {0}")]
    MalformedResponse(String),

    /// The model call did not finish within the configured timeout
    #[error("Extraction timed out after {0}s")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::MalformedResponse(e.to_string())
    }
}
