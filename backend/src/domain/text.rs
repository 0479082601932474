//! Bounded free-text fields shared by user and game records.

/// Failure raised when a text field does not satisfy its bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextFieldError {
    /// The value was empty or whitespace.
    #[error("{field} must not be empty")]
    Blank {
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// The value exceeded its maximum length in characters.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Wire name of the offending field.
        field: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
    /// The value had the wrong shape.
    #[error("{field} {reason}")]
    Malformed {
        /// Wire name of the offending field.
        field: &'static str,
        /// Short description of the expected shape.
        reason: &'static str,
    },
}

impl TextFieldError {
    /// Wire name of the offending field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } | Self::Malformed { field, .. } => {
                field
            }
        }
    }
}

/// Trim `value` and check it is non-empty and at most `max` characters.
pub(crate) fn bounded(
    field: &'static str,
    value: impl Into<String>,
    max: usize,
) -> Result<String, TextFieldError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TextFieldError::Blank { field });
    }
    if trimmed.chars().count() > max {
        return Err(TextFieldError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}
