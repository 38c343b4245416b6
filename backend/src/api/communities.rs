//! Community API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use shepherd_shared::models::{Community, MessageResponse, UpdateCommunityRequest};

use super::{identity_or_new, require, success, ApiResult};
use crate::errors::AppError;
use crate::AppState;

fn check_capacity(capacity: i64) -> Result<(), AppError> {
    if capacity < 0 {
        return Err(AppError::Validation(
            "Max capacity cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/communities - List all communities.
pub async fn list_communities(State(state): State<AppState>) -> ApiResult<Vec<Community>> {
    success(state.repo.list_communities().await?)
}

/// POST /api/communities - Create a new community.
pub async fn create_community(
    State(state): State<AppState>,
    Json(mut community): Json<Community>,
) -> ApiResult<Community> {
    require(&community.name, "Name")?;
    check_capacity(community.max_capacity)?;
    community.id = identity_or_new(&community.id);

    success(state.repo.create_community(&community).await?)
}

/// PUT /api/communities/:id - Update a community.
pub async fn update_community(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCommunityRequest>,
) -> ApiResult<Community> {
    if let Some(name) = &request.name {
        require(name, "Name")?;
    }
    if let Some(capacity) = request.max_capacity {
        check_capacity(capacity)?;
    }

    success(state.repo.update_community(&id, &request).await?)
}

/// DELETE /api/communities/:id - Delete a community.
pub async fn delete_community(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    state.repo.delete_community(&id).await?;
    success(MessageResponse::new("Deleted successfully"))
}
