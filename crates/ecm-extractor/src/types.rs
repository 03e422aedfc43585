//! Request and response types for extraction

use crate::flatten::{flatten, FlatRecord};
use ecm_domain::{EcmRecord, FieldError};
use std::fmt;

/// Request to extract ECM records from one document
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Document text (plain or markdown)
    pub text: String,

    /// Source identifier (filename, hash or user-provided)
    pub source_id: String,

    /// Model override for this request
    pub model: Option<String>,
}

impl ExtractionRequest {
    /// Request with no model override
    pub fn new(text: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_id: source_id.into(),
            model: None,
        }
    }

    /// Override the model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Result of an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Validated records, in model output order
    pub records: Vec<EcmRecord>,

    /// Elements that failed validation
    pub failures: Vec<ElementFailure>,

    /// Text the records were extracted from
    pub source_text: String,

    /// Source identifier
    pub source_id: String,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// Number of validated records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Flattened form of every record, in order
    pub fn to_flat_records(&self) -> Vec<FlatRecord> {
        self.records.iter().map(flatten).collect()
    }
}

/// An array element that was dropped during validation
#[derive(Debug, Clone, PartialEq)]
pub struct ElementFailure {
    /// 1-based position in the model's array
    pub element: usize,

    /// Every field error found in the element
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ElementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ECM {} validation failed", self.element)?;
        for error in &self.errors {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

/// Metadata about an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Source identifier
    pub source_id: String,

    /// Unix timestamp (seconds) when extraction finished
    pub timestamp: u64,

    /// Transport that served the call
    pub provider: String,

    /// Model requested, if any
    pub model: Option<String>,

    /// Number of array elements the model returned
    pub elements_attempted: usize,

    /// Number of elements that validated
    pub records_validated: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
