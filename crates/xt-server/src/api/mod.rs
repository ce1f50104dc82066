//! HTTP API over the user directory and activity log.

mod error;
mod extract;
mod handlers;

use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use xt_core::{ServiceError, StorageError, Store};

pub use error::{ApiError, ErrorStyle, Operation};
pub use extract::FormOrJson;

/// Store handle shared by all requests.
pub type SharedStore = Arc<Mutex<Box<dyn Store + Send>>>;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    store: SharedStore,
    error_style: ErrorStyle,
}

impl AppState {
    pub fn new(store: Box<dyn Store + Send>, error_style: ErrorStyle) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            error_style,
        }
    }

    /// Runs a store operation on the blocking pool with the store locked.
    ///
    /// A poisoned lock or a panicked task fails only this request.
    async fn with_store<T, F>(&self, operation: Operation, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut (dyn Store + Send)) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let joined = tokio::task::spawn_blocking(move || {
            let mut guard = store
                .lock()
                .map_err(|_| StorageError::msg("store lock poisoned"))?;
            f(&mut **guard)
        })
        .await;

        let result = joined.unwrap_or_else(|join_error| {
            Err(StorageError::new("store task failed", join_error).into())
        });
        result.map_err(|source| self.reject(operation, source))
    }

    /// Wraps a failure in the configured error style.
    fn reject(&self, operation: Operation, source: impl Into<ServiceError>) -> ApiError {
        ApiError::new(operation, self.error_style, source.into())
    }
}

/// Builds the application router.
///
/// When `static_dir` is set, unmatched paths are served from it, including
/// `index.html` at `/`.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let routes = Router::new()
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route("/api/users/{id}/exercises", post(handlers::add_exercise))
        .route("/api/users/{id}/logs", get(handlers::get_logs))
        .route("/health", get(handlers::health));

    let routes = match static_dir {
        Some(dir) => routes.fallback_service(ServeDir::new(dir)),
        None => routes,
    };

    routes
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
