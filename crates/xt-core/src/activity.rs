//! Logging exercises against users and querying their history.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::directory;
use crate::error::ServiceError;
use crate::exercise::{ExerciseFilter, LogRow, NewExercise, parse_date, render_date};
use crate::store::Store;
use crate::types::{UserId, ValidationError, parse_duration, parse_limit};

/// Raw input for a new exercise, as received from a form or the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryInput {
    pub description: String,
    pub duration: String,
    pub date: Option<String>,
}

/// Raw log query parameters. Blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

/// The result of adding an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub date: String,
    pub duration: u32,
    pub description: String,
}

/// One rendered row of a user's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: u32,
    pub date: String,
}

impl From<LogRow> for LogEntry {
    fn from(row: LogRow) -> Self {
        Self {
            description: row.description,
            duration: row.duration,
            date: render_date(row.date),
        }
    }
}

/// A user's identity together with a filtered slice of their log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogView {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub count: usize,
    pub log: Vec<LogEntry>,
}

/// Adds an exercise for a user, dating it today when no date is given.
pub fn add_entry<S: Store + ?Sized>(
    store: &mut S,
    user_id: &str,
    input: &EntryInput,
) -> Result<EntryView, ServiceError> {
    add_entry_on(store, user_id, input, Local::now().date_naive())
}

/// Adds an exercise for a user, using `today` when no date is given.
pub fn add_entry_on<S: Store + ?Sized>(
    store: &mut S,
    user_id: &str,
    input: &EntryInput,
    today: NaiveDate,
) -> Result<EntryView, ServiceError> {
    let user = directory::require(store, user_id)?;

    let duration = parse_duration(&input.duration)?;
    let date = parse_date("date", input.date.as_deref())?.unwrap_or(today);
    if input.description.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: "description",
        }
        .into());
    }

    let exercise = NewExercise {
        user_id: user.id.clone(),
        description: input.description.clone(),
        duration,
        date,
    };
    let exercise_id = store.insert_exercise(&exercise)?;
    tracing::debug!(user_id = %user.id, %exercise_id, %date, duration, "added exercise");

    Ok(EntryView {
        id: user.id,
        username: user.username,
        date: render_date(exercise.date),
        duration: exercise.duration,
        description: exercise.description,
    })
}

/// Builds the store filter for a log query.
pub fn build_filter(user_id: UserId, query: &LogQuery) -> Result<ExerciseFilter, ValidationError> {
    Ok(ExerciseFilter {
        from: parse_date("from", query.from.as_deref())?,
        to: parse_date("to", query.to.as_deref())?,
        limit: parse_limit(query.limit.as_deref())?,
        ..ExerciseFilter::for_user(user_id)
    })
}

/// Returns a user's exercises within the optional date bounds, up to `limit` rows.
pub fn get_logs<S: Store + ?Sized>(
    store: &S,
    user_id: &str,
    query: &LogQuery,
) -> Result<LogView, ServiceError> {
    let user = directory::require(store, user_id)?;
    let filter = build_filter(user.id.clone(), query)?;

    let log: Vec<LogEntry> = store
        .find_exercises(&filter)?
        .into_iter()
        .map(LogEntry::from)
        .collect();
    tracing::debug!(user_id = %user.id, ?filter, rows = log.len(), "fetched logs");

    Ok(LogView {
        id: user.id,
        username: user.username,
        count: log.len(),
        log,
    })
}
