use axum::Json;
use axum::extract::{Path, RawQuery, State};
use serde::{Deserialize, Serialize};
use xt_core::{
    EntryInput, EntryView, LogQuery, LogView, User, ValidationError, activity, directory,
};

use super::extract::{FormOrJson, lenient_opt_string, lenient_string};
use super::{ApiError, AppState, Operation};

#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    #[serde(default, deserialize_with = "lenient_string")]
    username: String,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseBody {
    #[serde(default, deserialize_with = "lenient_string")]
    description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    duration: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogParams {
    from: Option<String>,
    to: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn create_user(
    State(state): State<AppState>,
    FormOrJson(body): FormOrJson<CreateUserBody>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .with_store(Operation::CreateUser, move |store| {
            directory::register(store, &body.username)
        })
        .await?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok(Json(user))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .with_store(Operation::ListUsers, |store| directory::list_all(&*store))
        .await?;
    Ok(Json(users))
}

pub async fn add_exercise(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    FormOrJson(body): FormOrJson<ExerciseBody>,
) -> Result<Json<EntryView>, ApiError> {
    let input = EntryInput {
        description: body.description,
        duration: body.duration,
        date: body.date,
    };
    let entry = state
        .with_store(Operation::AddExercise, move |store| {
            activity::add_entry(store, &user_id, &input)
        })
        .await?;
    tracing::info!(user_id = %entry.id, duration = entry.duration, "exercise logged");
    Ok(Json(entry))
}

pub async fn get_logs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<Json<LogView>, ApiError> {
    let params: LogParams = serde_urlencoded::from_str(raw.as_deref().unwrap_or_default())
        .map_err(|e| {
            state.reject(
                Operation::FetchLogs,
                ValidationError::Malformed {
                    part: "query",
                    message: e.to_string(),
                },
            )
        })?;
    let query = LogQuery {
        from: params.from,
        to: params.to,
        limit: params.limit,
    };
    let view = state
        .with_store(Operation::FetchLogs, move |store| {
            activity::get_logs(&*store, &user_id, &query)
        })
        .await?;
    Ok(Json(view))
}
