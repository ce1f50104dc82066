//! The persistence contract consumed by the user directory and activity log.

use std::error::Error as StdError;

use thiserror::Error;

use crate::exercise::{ExerciseFilter, LogRow, NewExercise};
use crate::types::{ExerciseId, UserId};
use crate::user::User;

/// A store operation could not be completed.
///
/// Carries a short description of the failed operation and, when available,
/// the backend error that caused it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StorageError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl StorageError {
    /// Creates an error with no underlying cause.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a backend error.
    pub fn new(message: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Persistent storage for users and their exercises.
///
/// Implementations assign identifiers on insert. The trait is object safe so
/// callers can hold a `Box<dyn Store + Send>` chosen at startup.
pub trait Store {
    /// Inserts a user and returns its generated ID.
    fn insert_user(&mut self, username: &str) -> Result<UserId, StorageError>;

    /// Looks up a user by exact ID.
    fn find_user(&self, id: &UserId) -> Result<Option<User>, StorageError>;

    /// Lists every user in a stable order.
    fn list_users(&self) -> Result<Vec<User>, StorageError>;

    /// Inserts an exercise and returns its generated ID.
    fn insert_exercise(&mut self, exercise: &NewExercise) -> Result<ExerciseId, StorageError>;

    /// Reads exercises matching `filter`, ordered by date then insertion.
    fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<LogRow>, StorageError>;
}
