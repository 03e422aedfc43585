//! Parse a raw model reply into validated records

use crate::error::ExtractorError;
use crate::recovery::recover_json;
use crate::types::ElementFailure;
use crate::validate::{validate_record, ValidationOptions};
use ecm_domain::EcmRecord;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Outcome of parsing one reply
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    /// Elements that validated, in reply order
    pub records: Vec<EcmRecord>,

    /// Elements that did not
    pub failures: Vec<ElementFailure>,

    /// Number of elements in the (possibly coerced) array
    pub elements_attempted: usize,

    /// The reply was a single object and was wrapped into an array
    pub coerced_from_object: bool,
}

/// Recover, parse and validate a model reply
///
/// A top-level value that is not an array is treated as a one-element array.
/// Element validation failures are collected, never fatal.
///
/// # Errors
///
/// [`ExtractorError::MalformedResponse`] when the recovered text is not JSON.
pub fn parse_reply(raw: &str, options: &ValidationOptions) -> Result<ParsedBatch, ExtractorError> {
    let json_str = recover_json(raw);
    debug!("Recovered JSON fragment: {} chars", json_str.len());

    let parsed: Value = serde_json::from_str(&json_str)?;

    let (elements, coerced_from_object) = match parsed {
        Value::Array(items) => (items, false),
        other => {
            info!("LLM returned single object, converting to array");
            (vec![other], true)
        }
    };

    if elements.is_empty() {
        warn!("LLM returned empty array");
    }

    let mut batch = ParsedBatch {
        elements_attempted: elements.len(),
        coerced_from_object,
        ..ParsedBatch::default()
    };

    for (idx, element) in elements.iter().enumerate() {
        let position = idx + 1;
        match validate_record(element, options) {
            Ok(record) => {
                info!("ECM {}: {}", position, record.name());
                batch.records.push(record);
            }
            Err(errors) => {
                warn!("ECM {} validation failed", position);
                for error in &errors {
                    warn!("  {}", error);
                }
                batch.failures.push(ElementFailure {
                    element: position,
                    errors,
                });
            }
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<ParsedBatch, ExtractorError> {
        parse_reply(raw, &ValidationOptions::default())
    }

    #[test]
    fn test_fenced_array() {
        let batch = parse("```json\n[{\"ecm_detail\": {\"name\": \"LED\"}}]\n```").unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.elements_attempted, 1);
        assert!(!batch.coerced_from_object);
    }

    #[test]
    fn test_single_object_coerced() {
        let batch = parse(r#"{"ecm_detail": {"name": "LED"}}"#).unwrap();
        assert!(batch.coerced_from_object);
        assert_eq!(batch.records.len(), 1);
    }

    #[test]
    fn test_scalar_becomes_failed_element() {
        let batch = parse("42").unwrap();
        assert_eq!(batch.elements_attempted, 1);
        assert!(batch.records.is_empty());
        assert_eq!(batch.failures[0].element, 1);
    }

    #[test]
    fn test_empty_array_is_success() {
        let batch = parse("[]").unwrap();
        assert_eq!(batch.elements_attempted, 0);
        assert!(batch.records.is_empty());
        assert!(batch.failures.is_empty());
    }

    #[test]
    fn test_not_json() {
        let result = parse("I could not find any measures.");
        assert!(matches!(result, Err(ExtractorError::MalformedResponse(_))));
    }

    #[test]
    fn test_trailing_prose_after_sniff_is_malformed() {
        let result = parse("Here: [{\"ecm_detail\": {\"name\": \"A\"}}] hope this helps");
        assert!(matches!(result, Err(ExtractorError::MalformedResponse(_))));
    }

    #[test]
    fn test_failure_positions_are_one_based() {
        let raw = r#"[
            {"ecm_detail": {"name": "A"}},
            {"ecm_detail": {"description": "no name"}},
            {"ecm_detail": {"name": "C"}}
        ]"#;
        let batch = parse(raw).unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].element, 2);
        assert_eq!(batch.failures[0].errors[0].path, "ecm_detail.name");
    }
}
