//! Errors surfaced by directory and activity log operations.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::store::StorageError;
use crate::types::ValidationError;

/// Failure of a user directory or activity log operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced user does not exist.
    #[error("User not found")]
    UserNotFound,

    /// Request input could not be coerced.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store failed to complete a read or write.
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// Machine-readable classification of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Storage,
}

impl ErrorKind {
    /// String representation used in structured error bodies.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ServiceError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_is_stable() {
        assert_eq!(ServiceError::UserNotFound.to_string(), "User not found");
        assert_eq!(ServiceError::UserNotFound.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn validation_is_transparent() {
        let err = ServiceError::from(ValidationError::Empty {
            field: "description",
        });
        assert_eq!(err.to_string(), "description cannot be empty");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn kinds_serialize_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
        assert_eq!(ErrorKind::Storage.to_string(), "storage");
    }
}
