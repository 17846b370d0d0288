use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{EventDescriptor, Mode};

#[derive(Debug, Deserialize)]
pub struct EventsParams {
    pub mode: Option<Mode>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventDescriptor>,
    pub total: usize,
}

/// List catalog events, optionally narrowed to one mode. Catalog order
/// (oldest-first) is preserved.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventsParams>,
) -> Result<Json<EventsResponse>, ApiError> {
    let catalog = state.catalog.read().await;

    let events: Vec<EventDescriptor> = match params.mode {
        Some(mode) => catalog.events_for(mode).into_iter().cloned().collect(),
        None => catalog.all().to_vec(),
    };

    let total = events.len();
    Ok(Json(EventsResponse { events, total }))
}
