#![forbid(unsafe_code)]

//! Validation errors surfaced to the builder UI.

/// Error code for a missing required value.
pub const ERROR_CODE_REQUIRED: &str = "required";

/// A non-fatal validation failure.
///
/// `code` is stable for programmatic handling and localisation; `message`
/// is the default user-facing text and `field` names the offending input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Stable error code.
    pub code: &'static str,
    /// Name of the invalid field.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(code: &'static str, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            field,
            message: message.into(),
        }
    }

    /// A required field was empty or whitespace-only.
    #[must_use]
    pub fn required(field: &'static str) -> Self {
        Self::new(
            ERROR_CODE_REQUIRED,
            field,
            format!("{field} must not be empty"),
        )
    }

    /// Whether this is a missing-value error.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.code == ERROR_CODE_REQUIRED
    }
}
