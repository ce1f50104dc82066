//! Vector-backed [`Store`] for tests and throwaway servers.

use crate::exercise::{ExerciseFilter, LogRow, NewExercise};
use crate::store::{StorageError, Store};
use crate::types::{ExerciseId, UserId};
use crate::user::User;

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Vec<User>,
    exercises: Vec<NewExercise>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn insert_user(&mut self, username: &str) -> Result<UserId, StorageError> {
        let id = UserId::generate();
        self.users.push(User::new(id.clone(), username));
        Ok(id)
    }

    fn find_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        Ok(self.users.iter().find(|user| &user.id == id).cloned())
    }

    fn list_users(&self) -> Result<Vec<User>, StorageError> {
        Ok(self.users.clone())
    }

    fn insert_exercise(&mut self, exercise: &NewExercise) -> Result<ExerciseId, StorageError> {
        if !self.users.iter().any(|user| user.id == exercise.user_id) {
            return Err(StorageError::msg(format!(
                "exercise references unknown user {}",
                exercise.user_id
            )));
        }
        self.exercises.push(exercise.clone());
        Ok(ExerciseId::generate())
    }

    fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<LogRow>, StorageError> {
        let mut rows: Vec<LogRow> = self
            .exercises
            .iter()
            .filter(|e| filter.matches(&e.user_id, e.date))
            .map(|e| LogRow {
                description: e.description.clone(),
                duration: e.duration,
                date: e.date,
            })
            .collect();
        // Stable sort keeps insertion order within a day.
        rows.sort_by_key(|row| row.date);
        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }
}
