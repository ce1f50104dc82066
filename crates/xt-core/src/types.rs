//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for request input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The duration was not a non-negative whole number.
    #[error("duration must be a non-negative whole number of minutes, got {value:?}")]
    InvalidDuration { value: String },

    /// A date could not be parsed.
    #[error("{field} is not a valid date (expected YYYY-MM-DD), got {value:?}")]
    InvalidDate { field: &'static str, value: String },

    /// The result limit was not a non-negative integer.
    #[error("limit must be a non-negative integer, got {value:?}")]
    InvalidLimit { value: String },

    /// The request body or query string could not be decoded.
    #[error("request {part} could not be parsed: {message}")]
    Malformed { part: &'static str, message: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Generates a fresh random ID (32 lowercase hex characters).
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated user identifier.
    ///
    /// User IDs are opaque and assigned by the store on registration.
    UserId, "user ID"
);

define_string_id!(
    /// A validated exercise identifier.
    ExerciseId, "exercise ID"
);

/// Parses a duration in whole minutes.
///
/// Surrounding whitespace is ignored. Signs, fractions and empty input are rejected.
pub fn parse_duration(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidDuration {
            value: input.to_string(),
        });
    }
    trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidDuration {
            value: input.to_string(),
        })
}

/// Parses an optional result limit.
///
/// Blank input means no limit, and so does `0`.
pub fn parse_limit(input: Option<&str>) -> Result<Option<usize>, ValidationError> {
    let Some(trimmed) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let limit: usize = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidLimit {
            value: trimmed.to_string(),
        })?;
    Ok((limit > 0).then_some(limit))
}
