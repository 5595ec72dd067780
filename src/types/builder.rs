//! Builder error types shared by configuration surfaces.
//!
//! Builders are move-based: each setter takes `self` and returns `Self`,
//! and `build()` returns `Result<T, BuildError>` for recoverable
//! validation failures (unset required fields, unparseable environment
//! values, malformed config files).

use core::fmt;

/// Errors that can occur when building a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A required field was not provided.
    MissingRequired {
        /// Name of the missing field.
        field: &'static str,
    },
    /// A field value failed validation.
    InvalidValue {
        /// Name of the offending field or environment variable.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Domain-specific validation failure.
    Custom {
        /// Human-readable description.
        message: String,
    },
}

impl BuildError {
    /// A required field was not set.
    #[must_use]
    pub const fn missing_required(field: &'static str) -> Self {
        Self::MissingRequired { field }
    }

    /// A field value failed validation.
    #[must_use]
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// A domain-specific validation failure.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "required field not set: {field}")
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "invalid value for {field}: {reason}")
            }
            Self::Custom { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for BuildError {}

/// Result alias for builder operations.
pub type BuildResult<T> = Result<T, BuildError>;
