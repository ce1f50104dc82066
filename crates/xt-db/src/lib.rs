//! Storage layer for the exercise tracker.
//!
//! Provides persistence for users and their exercises using `rusqlite`, and
//! implements [`xt_core::Store`] on top of it.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but must be wrapped in a `Mutex`
//! to be shared. The HTTP server does exactly that.
//!
//! # Schema
//!
//! ## Date Format
//!
//! Exercise dates are stored as TEXT in `YYYY-MM-DD` form, so lexicographic
//! comparison in SQL matches calendar order and range filters can use the
//! `(user_id, date)` index. Creation timestamps are ISO 8601 UTC.
//!
//! ## Identifiers
//!
//! Users and exercises get random 32-character hex IDs on insert. Row order
//! (`rowid`) is used as the insertion-order tie breaker.

use std::path::Path;

use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use thiserror::Error;
use xt_core::exercise::STORAGE_DATE_FORMAT;
use xt_core::{ExerciseFilter, ExerciseId, LogRow, NewExercise, StorageError, Store, User, UserId};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored exercise date could not be parsed.
    #[error("invalid stored date for exercise {exercise_id}: {value}")]
    DateParse {
        exercise_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row violated the data model.
    #[error("invalid stored row {id}: {message}")]
    InvalidRow { id: String, message: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Exercises table: one row per logged activity
            -- date: calendar date, 'YYYY-MM-DD'
            -- duration: whole minutes
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                description TEXT NOT NULL,
                duration INTEGER NOT NULL CHECK (duration >= 0),
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            );

            CREATE INDEX IF NOT EXISTS idx_exercises_user_date ON exercises(user_id, date);
            ",
        )?;
        Ok(())
    }

    /// Inserts a user with a freshly generated ID.
    pub fn create_user(&mut self, username: &str) -> Result<UserId, DbError> {
        let id = UserId::generate();
        self.conn.execute(
            "INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)",
            params![id.as_str(), username, now_timestamp()],
        )?;
        Ok(id)
    }

    /// Fetches a user by ID.
    pub fn get_user(&self, id: &UserId) -> Result<Option<User>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE id = ?",
                [id.as_str()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        row.map(|(id, username)| user_from_row(id, username))
            .transpose()
    }

    /// Lists users in insertion order.
    pub fn all_users(&self) -> Result<Vec<User>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username FROM users ORDER BY rowid ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut users = Vec::new();
        for row in rows {
            let (id, username) = row?;
            users.push(user_from_row(id, username)?);
        }
        Ok(users)
    }

    /// Inserts an exercise with a freshly generated ID.
    ///
    /// Fails with a foreign key violation if the owning user does not exist.
    pub fn create_exercise(&mut self, exercise: &NewExercise) -> Result<ExerciseId, DbError> {
        let id = ExerciseId::generate();
        self.conn.execute(
            "
            INSERT INTO exercises (id, user_id, description, duration, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
            params![
                id.as_str(),
                exercise.user_id.as_str(),
                exercise.description,
                exercise.duration,
                exercise.date.format(STORAGE_DATE_FORMAT).to_string(),
                now_timestamp(),
            ],
        )?;
        Ok(id)
    }

    /// Reads exercises matching the filter, ordered by date then insertion.
    ///
    /// Both date bounds are inclusive.
    pub fn query_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<LogRow>, DbError> {
        let mut sql = String::from(
            "SELECT id, description, duration, date FROM exercises WHERE user_id = ?",
        );
        let mut values = vec![Value::Text(filter.user_id.to_string())];

        if let Some(from) = filter.from {
            sql.push_str(" AND date >= ?");
            values.push(Value::Text(from.format(STORAGE_DATE_FORMAT).to_string()));
        }
        if let Some(to) = filter.to {
            sql.push_str(" AND date <= ?");
            values.push(Value::Text(to.format(STORAGE_DATE_FORMAT).to_string()));
        }
        sql.push_str(" ORDER BY date ASC, rowid ASC");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut exercises = Vec::new();
        for row in rows {
            let (id, description, duration, date) = row?;
            exercises.push(LogRow {
                description,
                duration: u32::try_from(duration).map_err(|_| DbError::InvalidRow {
                    id: id.clone(),
                    message: format!("duration out of range: {duration}"),
                })?,
                date: parse_date(&date, &id)?,
            });
        }
        Ok(exercises)
    }
}

impl Store for Database {
    fn insert_user(&mut self, username: &str) -> Result<UserId, StorageError> {
        self.create_user(username)
            .map_err(|e| StorageError::new("failed to insert user", e))
    }

    fn find_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        self.get_user(id)
            .map_err(|e| StorageError::new("failed to look up user", e))
    }

    fn list_users(&self) -> Result<Vec<User>, StorageError> {
        self.all_users()
            .map_err(|e| StorageError::new("failed to list users", e))
    }

    fn insert_exercise(&mut self, exercise: &NewExercise) -> Result<ExerciseId, StorageError> {
        self.create_exercise(exercise)
            .map_err(|e| StorageError::new("failed to insert exercise", e))
    }

    fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<LogRow>, StorageError> {
        self.query_exercises(filter)
            .map_err(|e| StorageError::new("failed to query exercises", e))
    }
}

fn user_from_row(id: String, username: String) -> Result<User, DbError> {
    let user_id = UserId::new(id.clone()).map_err(|e| DbError::InvalidRow {
        id,
        message: e.to_string(),
    })?;
    Ok(User::new(user_id, username))
}

fn parse_date(value: &str, exercise_id: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, STORAGE_DATE_FORMAT).map_err(|source| DbError::DateParse {
        exercise_id: exercise_id.to_string(),
        value: value.to_string(),
        source,
    })
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use xt_core::LogQuery;
    use xt_core::activity::build_filter;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, STORAGE_DATE_FORMAT).unwrap()
    }

    fn exercise(user_id: &UserId, description: &str, duration: u32, day: &str) -> NewExercise {
        NewExercise {
            user_id: user_id.clone(),
            description: description.to_string(),
            duration,
            date: date(day),
        }
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        assert_eq!(
            table_columns(&db.conn, "users"),
            vec!["id", "username", "created_at"]
        );
        assert_eq!(
            table_columns(&db.conn, "exercises"),
            vec!["id", "user_id", "description", "duration", "date", "created_at"]
        );

        let exercise_indexes = index_names(&db.conn, "exercises");
        assert!(exercise_indexes.contains("idx_exercises_user_date"));

        let foreign_keys = foreign_keys(&db.conn, "exercises");
        assert_eq!(
            foreign_keys,
            vec![(
                "users".to_string(),
                "user_id".to_string(),
                "id".to_string()
            )]
        );
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("prepare table_info");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query table_info");
        rows.map(|row| row.expect("table_info row")).collect()
    }

    fn index_names(conn: &Connection, table: &str) -> HashSet<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA index_list({table})"))
            .expect("prepare index_list");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query index_list");
        rows.map(|row| row.expect("index_list row")).collect()
    }

    fn foreign_keys(conn: &Connection, table: &str) -> Vec<(String, String, String)> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA foreign_key_list({table})"))
            .expect("prepare foreign_key_list");
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .expect("query foreign_key_list");
        rows.map(|row| row.expect("foreign_key_list row")).collect()
    }

    #[test]
    fn users_round_trip_in_insertion_order() {
        let mut db = Database::open_in_memory().unwrap();
        let bob = db.create_user("Bob").unwrap();
        let alice = db.create_user("Alice").unwrap();

        let users = db.all_users().unwrap();
        assert_eq!(
            users,
            vec![User::new(bob.clone(), "Bob"), User::new(alice, "Alice")]
        );
        assert_eq!(db.get_user(&bob).unwrap(), Some(User::new(bob, "Bob")));
        assert_eq!(db.get_user(&UserId::generate()).unwrap(), None);
    }

    #[test]
    fn create_exercise_enforces_foreign_key() {
        let mut db = Database::open_in_memory().unwrap();
        let ghost = UserId::new("ghost").unwrap();

        let err = db
            .create_exercise(&exercise(&ghost, "run", 10, "2024-01-01"))
            .unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));

        let count: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn query_exercises_filters_inclusive_range() {
        let mut db = Database::open_in_memory().unwrap();
        let user = db.create_user("Alice").unwrap();
        for (desc, day) in [("a", "2023-01-01"), ("b", "2023-06-15"), ("c", "2023-12-31")] {
            db.create_exercise(&exercise(&user, desc, 10, day)).unwrap();
        }

        let filter = ExerciseFilter {
            user_id: user,
            from: Some(date("2023-01-01")),
            to: Some(date("2023-06-30")),
            limit: None,
        };
        let rows = db.query_exercises(&filter).unwrap();

        assert_eq!(
            rows,
            vec![
                LogRow {
                    description: "a".to_string(),
                    duration: 10,
                    date: date("2023-01-01"),
                },
                LogRow {
                    description: "b".to_string(),
                    duration: 10,
                    date: date("2023-06-15"),
                },
            ]
        );
    }

    fn descriptions(rows: &[LogRow]) -> Vec<&str> {
        rows.iter().map(|r| r.description.as_str()).collect()
    }

    fn seeded_range() -> (Database, UserId) {
        let mut db = Database::open_in_memory().unwrap();
        let user = db.create_user("Alice").unwrap();
        for (desc, day) in [("a", "2023-01-01"), ("b", "2023-06-15"), ("c", "2023-12-31")] {
            db.create_exercise(&exercise(&user, desc, 10, day)).unwrap();
        }
        (db, user)
    }

    #[test]
    fn query_exercises_upper_bound_alone_includes_that_day() {
        let (db, user) = seeded_range();
        let filter = ExerciseFilter {
            to: Some(date("2023-06-15")),
            ..ExerciseFilter::for_user(user)
        };

        let rows = db.query_exercises(&filter).unwrap();
        assert_eq!(descriptions(&rows), ["a", "b"]);
    }

    #[test]
    fn query_exercises_lower_bound_alone_includes_that_day() {
        let (db, user) = seeded_range();
        let filter = ExerciseFilter {
            from: Some(date("2023-06-15")),
            ..ExerciseFilter::for_user(user)
        };

        let rows = db.query_exercises(&filter).unwrap();
        assert_eq!(descriptions(&rows), ["b", "c"]);
    }

    #[test]
    fn query_exercises_with_equal_bounds_returns_that_day() {
        let (db, user) = seeded_range();
        let filter = ExerciseFilter {
            from: Some(date("2023-12-31")),
            to: Some(date("2023-12-31")),
            ..ExerciseFilter::for_user(user)
        };

        let rows = db.query_exercises(&filter).unwrap();
        assert_eq!(descriptions(&rows), ["c"]);
    }

    #[test]
    fn query_exercises_with_zero_or_blank_query_values_returns_everything() {
        let (db, user) = seeded_range();
        let query = LogQuery {
            from: Some(String::new()),
            to: None,
            limit: Some("0".to_string()),
        };
        let filter = build_filter(user, &query).unwrap();

        let rows = db.query_exercises(&filter).unwrap();
        assert_eq!(descriptions(&rows), ["a", "b", "c"]);
    }

    #[test]
    fn query_exercises_orders_and_limits() {
        let mut db = Database::open_in_memory().unwrap();
        let user = db.create_user("Alice").unwrap();
        db.create_exercise(&exercise(&user, "late", 1, "2023-12-31"))
            .unwrap();
        db.create_exercise(&exercise(&user, "first", 2, "2023-01-01"))
            .unwrap();
        db.create_exercise(&exercise(&user, "second", 3, "2023-01-01"))
            .unwrap();

        let mut filter = ExerciseFilter::for_user(user);
        filter.limit = Some(2);
        let rows = db.query_exercises(&filter).unwrap();

        let descriptions: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, ["first", "second"]);
    }

    #[test]
    fn query_exercises_is_scoped_to_user() {
        let mut db = Database::open_in_memory().unwrap();
        let alice = db.create_user("Alice").unwrap();
        let bob = db.create_user("Bob").unwrap();
        db.create_exercise(&exercise(&alice, "run", 30, "2024-01-01"))
            .unwrap();

        let rows = db.query_exercises(&ExerciseFilter::for_user(bob)).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn store_impl_wraps_errors_with_context() {
        let mut db = Database::open_in_memory().unwrap();
        let ghost = UserId::new("ghost").unwrap();

        let err = db
            .insert_exercise(&exercise(&ghost, "run", 10, "2024-01-01"))
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to insert exercise");
    }

    #[test]
    fn data_survives_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("xt.db");

        let user = {
            let mut db = Database::open(&path).unwrap();
            let user = db.create_user("Alice").unwrap();
            db.create_exercise(&exercise(&user, "run", 30, "2024-01-01"))
                .unwrap();
            user
        };

        let db = Database::open(&path).unwrap();
        assert_eq!(db.all_users().unwrap().len(), 1);
        assert_eq!(
            db.query_exercises(&ExerciseFilter::for_user(user))
                .unwrap()
                .len(),
            1
        );
    }
}
