//! Validation Support
//!
//! Traits and helpers for validating record payloads before they are
//! stored. Every resource implements [`Validatable`]; the REST handlers call
//! it on create and update and answer `422 Unprocessable Entity` with all
//! collected messages.
//!
//! # Example
//!
//! ```rust,ignore
//! use medsearch::validation::{Validatable, ValidationErrors, validators};
//!
//! impl Validatable for NoteCreate {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         errors.check(validators::validate_required("title", &self.title));
//!         errors.check(validators::validate_length("body", &self.body, Some(10), Some(1000)));
//!         errors.result()
//!     }
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add a validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the error of a failed check; successful checks are ignored
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.add(error);
        }
    }

    /// Merge errors from a nested value, prefixing their field names
    pub fn nest(&mut self, prefix: &str, result: Result<(), ValidationErrors>) {
        if let Err(nested) = result {
            for error in nested.errors {
                self.add(ValidationError::new(
                    format!("{prefix}.{}", error.field),
                    error.message,
                ));
            }
        }
    }

    /// Check if there are any errors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Get all errors
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was collected.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Trait for types that can be validated
pub trait Validatable {
    /// Validate the instance, collecting every failure.
    ///
    /// # Errors
    ///
    /// Returns all collected [`ValidationError`]s when any check fails.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Helper validators for common patterns
pub mod validators {
    use super::ValidationError;
    use chrono::DateTime;
    use std::fmt;

    /// Validate string length (in characters) is within range
    ///
    /// # Errors
    ///
    /// Fails when the length is outside `[min, max]`.
    pub fn validate_length(
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<(), ValidationError> {
        let len = value.chars().count();

        if let Some(min_len) = min
            && len < min_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at least {min_len} characters"),
            ));
        }

        if let Some(max_len) = max
            && len > max_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at most {max_len} characters"),
            ));
        }

        Ok(())
    }

    /// Validate number is within range
    ///
    /// # Errors
    ///
    /// Fails when `value` is outside `[min, max]`.
    pub fn validate_range<T: PartialOrd + fmt::Display>(
        field: &str,
        value: T,
        min: Option<T>,
        max: Option<T>,
    ) -> Result<(), ValidationError> {
        if let Some(min_val) = min
            && value < min_val
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at least {min_val}"),
            ));
        }

        if let Some(max_val) = max
            && value > max_val
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at most {max_val}"),
            ));
        }

        Ok(())
    }

    /// `local@domain.tld` with no whitespace
    ///
    /// # Errors
    ///
    /// Fails on anything that is not shaped like an email address.
    pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
        let invalid = || ValidationError::new(field, "Invalid email address");

        if value.chars().any(char::is_whitespace) || value.len() > 255 {
            return Err(invalid());
        }
        let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.contains('@') {
            return Err(invalid());
        }
        match domain.rsplit_once('.') {
            Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
            _ => Err(invalid()),
        }
    }

    /// Optional leading `+`, then digits, spaces, hyphens and parentheses
    ///
    /// # Errors
    ///
    /// Fails on empty input or any other character.
    pub fn validate_phone(field: &str, value: &str) -> Result<(), ValidationError> {
        let body = value.strip_prefix('+').unwrap_or(value);
        let valid = !body.is_empty()
            && body
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));
        if valid {
            Ok(())
        } else {
            Err(ValidationError::new(field, "Invalid phone format"))
        }
    }

    /// US ZIP code, `12345` or `12345-6789`
    ///
    /// # Errors
    ///
    /// Fails on any other shape.
    pub fn validate_zip_code(field: &str, value: &str) -> Result<(), ValidationError> {
        let digits = |s: &str, n: usize| s.len() == n && s.chars().all(|c| c.is_ascii_digit());
        let valid = match value.split_once('-') {
            Some((head, tail)) => digits(head, 5) && digits(tail, 4),
            None => digits(value, 5),
        };
        if valid {
            Ok(())
        } else {
            Err(ValidationError::new(field, "Invalid zip code format"))
        }
    }

    /// RFC 3339 date-time, e.g. `2024-03-15T10:00:00Z`
    ///
    /// # Errors
    ///
    /// Fails when the value does not parse.
    pub fn validate_datetime(field: &str, value: &str) -> Result<(), ValidationError> {
        DateTime::parse_from_rfc3339(value)
            .map(|_| ())
            .map_err(|_| ValidationError::new(field, "Invalid date-time format"))
    }

    /// Validate value is not empty
    ///
    /// # Errors
    ///
    /// Fails on empty or whitespace-only input.
    pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "This field is required"));
        }
        Ok(())
    }
}
