//! Exercise entries and the store-level query over them.

use chrono::{DateTime, NaiveDate};

use crate::types::{UserId, ValidationError};

/// Display format for exercise dates, e.g. `Mon Jan 01 2024`.
const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";

/// Storage format for exercise dates. Sorts lexicographically in date order.
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// An exercise ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub user_id: UserId,
    pub description: String,
    /// Whole minutes.
    pub duration: u32,
    pub date: NaiveDate,
}

/// A stored exercise projected to the fields returned in a log.
///
/// The exercise's own ID and its owner are intentionally absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub description: String,
    pub duration: u32,
    pub date: NaiveDate,
}

/// Filter for reading a user's exercises.
///
/// Both date bounds are inclusive. Results are ordered by ascending date,
/// ties broken by insertion order, and truncated to `limit` when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub user_id: UserId,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl ExerciseFilter {
    /// Filter matching every exercise owned by `user_id`.
    pub const fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            from: None,
            to: None,
            limit: None,
        }
    }

    /// Returns true if an exercise with this owner and date passes the filter.
    ///
    /// The limit is not considered.
    pub fn matches(&self, user_id: &UserId, date: NaiveDate) -> bool {
        &self.user_id == user_id
            && self.from.is_none_or(|from| date >= from)
            && self.to.is_none_or(|to| date <= to)
    }
}

/// Renders a date the way logs display it.
pub fn render_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Parses an optional date input.
///
/// Blank input is treated as absent. Accepts `YYYY-MM-DD`, or an RFC 3339
/// timestamp whose date part is taken as written.
pub fn parse_date(field: &'static str, input: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    let Some(trimmed) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, STORAGE_DATE_FORMAT) {
        return Ok(Some(date));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(dt.date_naive()));
    }

    Err(ValidationError::InvalidDate {
        field,
        value: trimmed.to_string(),
    })
}
