//! Rendering of service errors into HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use xt_core::{ErrorKind, ServiceError};

/// Shape of error bodies returned by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStyle {
    /// `{"error": "<message>"}`. A missing user is reported with status 200.
    #[default]
    Legacy,
    /// `{"error": {"kind": "<kind>", "message": "<message>"}}` with a matching status.
    Structured,
}

/// The API operation that failed, used to pick the storage failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateUser,
    ListUsers,
    AddExercise,
    FetchLogs,
    ReadBody,
}

impl Operation {
    /// Message shown to clients when the store fails. The cause is only logged.
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::CreateUser => "Error creating user",
            Self::ListUsers => "Error fetching users",
            Self::AddExercise => "Error adding exercise",
            Self::FetchLogs => "Error fetching logs",
            Self::ReadBody => "Error reading request body",
        }
    }
}

/// A failed API call.
#[derive(Debug)]
pub struct ApiError {
    operation: Operation,
    style: ErrorStyle,
    source: ServiceError,
}

impl ApiError {
    pub const fn new(operation: Operation, style: ErrorStyle, source: ServiceError) -> Self {
        Self {
            operation,
            style,
            source,
        }
    }

    fn status(&self) -> StatusCode {
        match (self.source.kind(), self.style) {
            (ErrorKind::NotFound, ErrorStyle::Legacy) => StatusCode::OK,
            (ErrorKind::NotFound, ErrorStyle::Structured) => StatusCode::NOT_FOUND,
            (ErrorKind::Validation, _) => StatusCode::BAD_REQUEST,
            (ErrorKind::Storage, _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self.source.kind() {
            ErrorKind::Storage => self.operation.failure_message().to_string(),
            ErrorKind::NotFound | ErrorKind::Validation => self.source.to_string(),
        }
    }
}

#[derive(Serialize)]
struct LegacyBody {
    error: String,
}

#[derive(Serialize)]
struct StructuredBody {
    error: StructuredDetail,
}

#[derive(Serialize)]
struct StructuredDetail {
    kind: ErrorKind,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.source.kind();
        if kind == ErrorKind::Storage {
            tracing::error!(operation = ?self.operation, error = ?self.source, "store operation failed");
        } else {
            tracing::debug!(operation = ?self.operation, %kind, error = %self.source, "request rejected");
        }

        let status = self.status();
        let message = self.message();
        match self.style {
            ErrorStyle::Legacy => (status, Json(LegacyBody { error: message })).into_response(),
            ErrorStyle::Structured => (
                status,
                Json(StructuredBody {
                    error: StructuredDetail { kind, message },
                }),
            )
                .into_response(),
        }
    }
}
