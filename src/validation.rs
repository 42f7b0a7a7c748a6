//! Field-level validation with error accumulation.
//!
//! This module provides:
//! - `FieldPath` / `ValidationError` for structured errors that name the
//!   offending field, the expected constraint and the actual value
//! - Pure field validators shared by constructors, setters and builders
//! - `TreeValidation`, stillwater's `Validation` specialised to score tree
//!   errors, used by the builders to report ALL violations at once
//!
//! # Example
//!
//! ```rust
//! use scoretree::validation::{FieldPath, ValidationError};
//!
//! let error = ValidationError::at_field(&FieldPath::new("Score").push("weight"), "must be finite")
//!     .with_context("finite number", "NaN");
//!
//! assert_eq!(error.to_string(), "Score.weight: must be finite (expected: finite number, got: NaN)");
//! ```

use crate::errors::{Result, ScoreTreeError};
use stillwater::{NonEmptyVec, Validation};

/// Path from the root of a tree (or an entity) to a specific field.
///
/// Renders as a dot-separated string, e.g. `Track 1.Dynamics.weight`.
///
/// ```rust
/// use scoretree::validation::FieldPath;
///
/// let path = FieldPath::root().push("Track 1").push("items");
/// assert_eq!(path.as_string(), "Track 1.items");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Create an empty root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path with a single field.
    pub fn new(field: impl Into<String>) -> Self {
        Self(vec![field.into()])
    }

    /// Add a field to the path, returning a new path.
    pub fn push(&self, field: impl Into<String>) -> Self {
        let mut path = self.0.clone();
        path.push(field.into());
        Self(path)
    }

    /// Get the path as a dot-separated string.
    pub fn as_string(&self) -> String {
        self.0.join(".")
    }

    /// Check if this is the root path (no fields).
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the last segment of the path, if any.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(|s| s.as_str())
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(path: &FieldPath) -> Self {
        path.clone()
    }
}

/// Validation error with full field context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    /// The field path where the error occurred.
    pub field: FieldPath,
    /// Human-readable error message.
    pub message: String,
    /// Expected value or constraint.
    pub expected: Option<String>,
    /// Actual value that failed validation.
    pub actual: Option<String>,
}

impl ValidationError {
    /// Create a validation error at a specific field.
    pub fn at_field(field: &FieldPath, message: impl Into<String>) -> Self {
        Self {
            field: field.clone(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Add expected and actual context to the error.
    pub fn with_context(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_root() {
            write!(f, "{}", self.message)?;
        } else {
            write!(f, "{}: {}", self.field, self.message)?;
        }

        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected: {}, got: {})", expected, actual)?;
        } else if let Some(expected) = &self.expected {
            write!(f, " (expected: {})", expected)?;
        } else if let Some(actual) = &self.actual {
            write!(f, " (got: {})", actual)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validation result accumulating every score tree violation.
pub type TreeValidation<T> = Validation<T, NonEmptyVec<ScoreTreeError>>;

/// Build a validation from collected violations, running `build` only when
/// there are none.
pub fn finish_validation<T>(
    errors: Vec<ScoreTreeError>,
    build: impl FnOnce() -> Result<T>,
) -> TreeValidation<T> {
    match NonEmptyVec::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => match build() {
            Ok(value) => Validation::Success(value),
            Err(error) => Validation::Failure(NonEmptyVec::new(error, Vec::new())),
        },
    }
}

/// Convert a validation into a fail-fast `Result`.
///
/// A single violation is returned as is; several are wrapped in
/// `ScoreTreeError::Invalid`.
pub fn into_result<T>(validation: TreeValidation<T>) -> Result<T> {
    match validation {
        Validation::Success(value) => Ok(value),
        Validation::Failure(errors) => {
            let errors: Vec<ScoreTreeError> = errors.into_iter().collect();
            Err(ScoreTreeError::from_violations(errors)
                .unwrap_or_else(|| ScoreTreeError::Invalid { errors: Vec::new() }))
        }
    }
}

// ============================================================================
// Field validators
// ============================================================================

/// Pure function: a real number usable in score arithmetic.
pub fn ensure_finite(field: &FieldPath, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ScoreTreeError::value(
            field,
            "must be a finite number",
            "finite number",
            value.to_string(),
        ))
    }
}

/// Pure function: weights are finite and non-negative.
pub fn ensure_weight(field: &FieldPath, weight: f64) -> Result<f64> {
    let weight = ensure_finite(field, weight)?;
    if weight < 0.0 {
        return Err(ScoreTreeError::value(
            field,
            "weight must not be negative",
            ">= 0",
            weight.to_string(),
        ));
    }
    Ok(weight)
}

/// Pure function: a range whose span is non-zero.
///
/// `min > max` is accepted; normalization then runs over a negative span.
pub fn ensure_range(field: &FieldPath, range: (f64, f64)) -> Result<(f64, f64)> {
    let min = ensure_finite(&field.push("min"), range.0)?;
    let max = ensure_finite(&field.push("max"), range.1)?;
    if max == min {
        return Err(ScoreTreeError::domain(
            field,
            format!("range span is zero ({min}, {max}), normalization is undefined"),
        ));
    }
    Ok((min, max))
}

/// Collect the error of a validator without short-circuiting.
pub(crate) fn collect<T>(result: Result<T>, errors: &mut Vec<ScoreTreeError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn field_path_builds_nested_names() {
        let path = FieldPath::root().push("Track 1").push("Dynamics");
        assert_eq!(path.as_string(), "Track 1.Dynamics");
        assert_eq!(path.len(), 2);
        assert_eq!(path.last(), Some("Dynamics"));
        assert!(!path.is_root());
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn validation_error_display_variants() {
        let path = FieldPath::new("weight");
        let bare = ValidationError::at_field(&path, "invalid");
        assert_eq!(bare.to_string(), "weight: invalid");
        assert_eq!(
            bare.clone().with_expected("finite").to_string(),
            "weight: invalid (expected: finite)"
        );
        assert_eq!(bare.with_actual("NaN").to_string(), "weight: invalid (got: NaN)");

        let root = ValidationError::at_field(&FieldPath::root(), "tree is empty");
        assert_eq!(root.to_string(), "tree is empty");
    }

    #[test]
    fn ensure_weight_rejects_negative_and_nan() {
        let field = FieldPath::new("Score").push("weight");
        assert_eq!(ensure_weight(&field, 0.25).unwrap(), 0.25);
        assert_eq!(ensure_weight(&field, 0.0).unwrap(), 0.0);

        let negative = ensure_weight(&field, -0.1).unwrap_err();
        assert_eq!(negative.kind(), ErrorKind::Value);
        assert!(negative.to_string().contains("got: -0.1"));

        assert_eq!(
            ensure_weight(&field, f64::NAN).unwrap_err().kind(),
            ErrorKind::Value
        );
    }

    #[test]
    fn ensure_range_rejects_zero_span() {
        let field = FieldPath::new("Score").push("range");
        assert_eq!(ensure_range(&field, (0.0, 1.0)).unwrap(), (0.0, 1.0));
        assert_eq!(ensure_range(&field, (10.0, 0.0)).unwrap(), (10.0, 0.0));

        let err = ensure_range(&field, (5.0, 5.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.field().unwrap().as_string(), "Score.range");

        let err = ensure_range(&field, (0.0, f64::INFINITY)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.field().unwrap().as_string(), "Score.range.max");
    }

    #[test]
    fn finish_validation_skips_build_on_errors() {
        let validation: TreeValidation<u32> = finish_validation(
            vec![ScoreTreeError::domain("range", "zero span")],
            || panic!("build must not run"),
        );
        assert!(validation.is_failure());

        let validation = finish_validation(Vec::new(), || Ok(7));
        assert!(validation.is_success());
        assert_eq!(into_result(validation).unwrap(), 7);
    }

    #[test]
    fn into_result_wraps_multiple_violations() {
        let validation: TreeValidation<()> = finish_validation(
            vec![
                ScoreTreeError::domain("a", "first"),
                ScoreTreeError::domain("b", "second"),
            ],
            || Ok(()),
        );

        match into_result(validation) {
            Err(ScoreTreeError::Invalid { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }
}
