//! Calculation error types

use thiserror::Error;

/// Result type for scenario calculations
pub type CalcResult<T> = Result<T, CalcError>;

/// Errors a calculation can end with.
///
/// The `Display` text of every variant is exactly what lands in the
/// `{ "error": ... }` record handed back to callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// A required field is missing, not numeric, or out of range
    #[error("{message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    /// The inputs would drive a mathematically undefined operation
    #[error("{message}")]
    Domain {
        field: &'static str,
        message: String,
    },

    /// Anything the named rules did not anticipate
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// Scenario identifier not recognised by the dispatcher
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

impl CalcError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub fn domain(field: &'static str, message: impl Into<String>) -> Self {
        CalcError::Domain {
            field,
            message: message.into(),
        }
    }

    /// Input field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CalcError::InvalidInput { field, .. } | CalcError::Domain { field, .. } => Some(field),
            CalcError::Unexpected(_) | CalcError::UnknownScenario(_) => None,
        }
    }

    /// Check if the caller can fix this by changing its inputs
    pub fn is_validation(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. } | CalcError::Domain { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let err = CalcError::invalid("bandwidth", "Bandwidth must be greater than 0.");
        assert_eq!(err.to_string(), "Bandwidth must be greater than 0.");
        assert_eq!(err.field(), Some("bandwidth"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_unexpected_prefix() {
        let err = CalcError::Unexpected("rate overflow".into());
        assert_eq!(err.to_string(), "Unexpected error: rate overflow");
        assert!(!err.is_validation());
        assert_eq!(err.field(), None);
    }
}
