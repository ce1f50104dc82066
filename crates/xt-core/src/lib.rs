//! Core domain logic for the exercise tracker.
//!
//! This crate contains:
//! - The [`Store`] contract that persistence backends implement
//! - The user directory: registration, listing and lookup
//! - The activity log: adding exercises and querying a user's history
//! - A single error taxonomy shared by every operation

pub mod activity;
pub mod directory;
mod error;
pub mod exercise;
pub mod memory;
mod store;
mod types;
mod user;

pub use activity::{EntryInput, EntryView, LogEntry, LogQuery, LogView};
pub use error::{ErrorKind, ServiceError};
pub use exercise::{ExerciseFilter, LogRow, NewExercise};
pub use memory::MemoryStore;
pub use store::{StorageError, Store};
pub use types::{ExerciseId, UserId, ValidationError};
pub use user::User;
