//! Configuration for the Extractor

use crate::validate::ValidationOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default value for `submission_metadata.extracted_by`
pub const DEFAULT_EXTRACTED_BY: &str = "ECM Extractor";

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum time for a single model call (seconds)
    pub extraction_timeout_secs: u64,

    /// Sampling temperature passed to the model
    pub temperature: f32,

    /// Model used when a request does not name one; `None` leaves the choice
    /// to the transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// Reject units and currencies outside the canonical sets
    pub strict_units: bool,

    /// Filled into a submission block that omits `extracted_by`
    pub extracted_by: String,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Options for element validation derived from this config
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            strict_units: self.strict_units,
            extracted_by_default: Some(self.extracted_by.clone()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature {} out of range [0.0, 2.0]",
                self.temperature
            ));
        }
        if let Some(model) = &self.default_model {
            if model.trim().is_empty() {
                return Err("default_model must not be empty when set".to_string());
            }
        }
        Ok(())
    }

    /// Strict preset: canonical units enforced
    pub fn strict() -> Self {
        Self {
            strict_units: true,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            extraction_timeout_secs: 120,
            temperature: 0.0,
            default_model: None,
            strict_units: false,
            extracted_by: DEFAULT_EXTRACTED_BY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction_timeout(), Duration::from_secs(120));
        assert_eq!(config.temperature, 0.0);
        assert!(!config.strict_units);
    }

    #[test]
    fn test_strict_config_is_valid() {
        let config = ExtractorConfig::strict();
        assert!(config.validate().is_ok());
        assert!(config.validation_options().strict_units);
    }

    #[test]
    fn test_invalid_timeout() {
        let config = ExtractorConfig {
            extraction_timeout_secs: 0,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature() {
        let config = ExtractorConfig {
            temperature: 3.5,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_default_model() {
        let config = ExtractorConfig {
            default_model: Some("  ".to_string()),
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_options_carry_extracted_by() {
        let options = ExtractorConfig::default().validation_options();
        assert_eq!(options.extracted_by_default.as_deref(), Some("ECM Extractor"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig {
            default_model: Some("openai/gpt-4o".to_string()),
            ..ExtractorConfig::strict()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("strict_units = true").unwrap();
        assert!(parsed.strict_units);
        assert_eq!(parsed.extraction_timeout_secs, 120);
        assert_eq!(parsed.extracted_by, DEFAULT_EXTRACTED_BY);
    }
}
