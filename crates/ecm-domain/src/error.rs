//! Domain error types

use std::fmt;

/// Errors raised when constructing a quantity
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityError {
    /// Value is NaN or infinite
    NonFinite(f64),

    /// Value is below zero for a physical quantity
    Negative(f64),
}

impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityError::NonFinite(v) => write!(f, "value {} is not a finite number", v),
            QuantityError::Negative(v) => {
                write!(f, "value {} must be greater than or equal to 0", v)
            }
        }
    }
}

impl std::error::Error for QuantityError {}

/// A single field-level validation failure inside one extracted element
///
/// `path` is dot-separated from the record root, e.g. `ecm_detail.name` or
/// `ecm_detail.savings_by_fuel.0.energy_savings.value`. An empty path refers
/// to the element itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dot-separated path to the offending field
    pub path: String,

    /// Human-readable description of the problem
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(element): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new("ecm_detail.name", "field required");
        assert_eq!(err.to_string(), "ecm_detail.name: field required");
    }

    #[test]
    fn test_field_error_display_root() {
        let err = FieldError::new("", "expected a JSON object");
        assert_eq!(err.to_string(), "(element): expected a JSON object");
    }

    #[test]
    fn test_quantity_error_display() {
        assert_eq!(
            QuantityError::Negative(-1.0).to_string(),
            "value -1 must be greater than or equal to 0"
        );
    }
}
