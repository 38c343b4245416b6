//! Event API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use shepherd_shared::models::{Event, MessageResponse, UpdateEventRequest};

use super::{identity_or_new, require, success, ApiResult};
use crate::AppState;

/// GET /api/events - List all events.
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Vec<Event>> {
    success(state.repo.list_events().await?)
}

/// POST /api/events - Create a new event.
pub async fn create_event(
    State(state): State<AppState>,
    Json(mut event): Json<Event>,
) -> ApiResult<Event> {
    require(&event.name, "Event name")?;
    event.id = identity_or_new(&event.id);

    success(state.repo.create_event(&event).await?)
}

/// PUT /api/events/:id - Update an event.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateEventRequest>,
) -> ApiResult<Event> {
    if let Some(name) = &request.name {
        require(name, "Event name")?;
    }

    success(state.repo.update_event(&id, &request).await?)
}

/// DELETE /api/events/:id - Delete an event.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    state.repo.delete_event(&id).await?;
    success(MessageResponse::new("Deleted successfully"))
}
