//! Error types for score tree construction and mutation.
//!
//! Every failure is reported synchronously at the point of mutation, so an
//! invalid tree can never be observed. Errors fall into three kinds:
//!
//! - `Type`: a field received a value of the wrong semantic type. The typed
//!   constructors make this impossible; it shows up when trees are built from
//!   dynamic key-value data (see [`crate::definition`]).
//! - `Value`: the type is right but a domain constraint is violated (weights
//!   not adding up to 1, a non-finite number, a range that is not a pair).
//! - `Domain`: a mathematically undefined operation, i.e. a zero-span range.
//!
//! # Example
//!
//! ```rust
//! use scoretree::{ErrorKind, Score};
//!
//! let err = Score::new("Speed", 0.5, (10.0, 10.0), 10.0, false).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Domain);
//! ```

use crate::validation::{FieldPath, ValidationError};
use thiserror::Error;

/// Category of a [`ScoreTreeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Type,
    Value,
    Domain,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Value => "value",
            Self::Domain => "domain",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for score tree operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreTreeError {
    /// A field received a value of the wrong type
    #[error("expected type {expected} for {field} but got {actual} instead")]
    Type {
        field: FieldPath,
        expected: String,
        actual: String,
    },

    /// A field value violates a domain constraint
    #[error("{0}")]
    Value(ValidationError),

    /// Normalization is undefined for the given input
    #[error("{field}: {message}")]
    Domain { field: FieldPath, message: String },

    /// Several violations reported at once by a builder
    #[error("{} violations: {}", .errors.len(), join_messages(.errors))]
    Invalid { errors: Vec<ScoreTreeError> },
}

impl ScoreTreeError {
    /// Create a type error for a field.
    pub fn type_mismatch(
        field: impl Into<FieldPath>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Type {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a value error at a field with expected/actual context.
    pub fn value(
        field: &FieldPath,
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Value(ValidationError::at_field(field, message).with_context(expected, actual))
    }

    /// Create a domain error at a field.
    pub fn domain(field: impl Into<FieldPath>, message: impl Into<String>) -> Self {
        Self::Domain {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Error for a collection whose direct children's weights do not add up to 1.
    ///
    /// The root path stands for the tree itself.
    pub fn weight_sum(owner: &FieldPath, total: f64) -> Self {
        let message = if owner.is_root() {
            "score tree weights do not add up to 1".to_string()
        } else {
            "score weights do not add up to 1".to_string()
        };
        Self::value(owner, message, "1", total.to_string())
    }

    /// Collapse a list of violations: one violation is returned as is,
    /// several are wrapped in `Invalid`.
    ///
    /// Returns `None` for an empty list.
    pub fn from_violations(mut errors: Vec<ScoreTreeError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Invalid { errors }),
        }
    }

    /// Kind of the error. `Invalid` reports the kind of its first violation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Type { .. } => ErrorKind::Type,
            Self::Value(_) => ErrorKind::Value,
            Self::Domain { .. } => ErrorKind::Domain,
            Self::Invalid { errors } => errors
                .first()
                .map(ScoreTreeError::kind)
                .unwrap_or(ErrorKind::Value),
        }
    }

    /// Field the error refers to, if it names a single one.
    pub fn field(&self) -> Option<&FieldPath> {
        match self {
            Self::Type { field, .. } | Self::Domain { field, .. } => Some(field),
            Self::Value(error) => Some(&error.field),
            Self::Invalid { .. } => None,
        }
    }

    /// All individual violations carried by this error.
    pub fn violations(&self) -> Vec<&ScoreTreeError> {
        match self {
            Self::Invalid { errors } => errors.iter().flat_map(|e| e.violations()).collect(),
            other => vec![other],
        }
    }
}

fn join_messages(errors: &[ScoreTreeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, ScoreTreeError>;
