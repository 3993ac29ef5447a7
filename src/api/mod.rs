//! HTTP layer - axum router, shared state and the JSON error envelope.

/// Liveness endpoint
pub mod health;
/// Run, history and detail endpoints
pub mod simulation;

use crate::core::simulation::RunnerConfig;
use crate::errors::Error;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all persistence operations
    pub db: DatabaseConnection,
    /// Immutable runner settings; a runner is built per request from these
    pub runner_config: Arc<RunnerConfig>,
}

impl AppState {
    /// Bundles the database connection and runner settings.
    #[must_use]
    pub const fn new(db: DatabaseConnection, runner_config: Arc<RunnerConfig>) -> Self {
        Self { db, runner_config }
    }
}

/// Builds the application router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/simulation/run", post(simulation::run_simulation))
        .route("/simulation/history", get(simulation::simulation_history))
        .route("/simulation/{simulation_id}", get(simulation::get_simulation))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Error response rendered as `{"status": "error", "message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InputNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: format!("IDF file not found: {err}"),
            },
            Error::RunNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            Error::Simulation { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Simulation failed: {other}"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, "{}", self.message);
        }
        (
            self.status,
            Json(json!({ "status": "error", "message": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_input_not_found_maps_to_404() {
        let err = ApiError::from(Error::InputNotFound {
            path: PathBuf::from("/data/idf/default.idf"),
        });
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "IDF file not found: /data/idf/default.idf");
    }

    #[test]
    fn test_simulation_error_maps_to_500() {
        let err = ApiError::from(Error::Simulation {
            message: "disk full".to_string(),
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Simulation failed: disk full");
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let err = ApiError::from(Error::Config {
            message: "bad".to_string(),
        });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.starts_with("Simulation failed: "));
    }
}
