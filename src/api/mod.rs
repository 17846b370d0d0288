//! REST API endpoints.
//!
//! Axum-based HTTP API serving the event catalog, per-event ranked
//! tables, and per-guild trend charts. The crate's own routes live under
//! `/api`; an optional static directory serves the frontend shell.

use std::path::Path;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::fetch::FetchError;
use crate::history::HistoryError;

pub mod routes;
pub mod state;

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    #[error("Superseded by a newer request")]
    Stale,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match &e {
            FetchError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                ApiError::NotFound(e.to_string())
            }
            FetchError::HttpStatus { status: 404, .. } => ApiError::NotFound(e.to_string()),
            FetchError::InvalidReference(_) => ApiError::BadRequest(e.to_string()),
            _ => ApiError::Upstream(e.to_string()),
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(e: HistoryError) -> Self {
        match e {
            HistoryError::Stale => ApiError::Stale,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Stale => (StatusCode::CONFLICT, "STALE_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router. When `static_dir` is given, unmatched
/// paths fall through to the static frontend.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/api/events", get(routes::events::list_events))
        .route("/api/ranking/*file", get(routes::ranking::event_ranking))
        .route("/api/history/:guild", get(routes::history::guild_history))
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
