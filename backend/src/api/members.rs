//! Member API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use shepherd_shared::models::{Member, MessageResponse, UpdateMemberRequest};

use super::{identity_or_new, require, success, ApiResult};
use crate::AppState;

/// GET /api/members - List all members.
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Vec<Member>> {
    success(state.repo.list_members().await?)
}

/// POST /api/members - Create a new member.
pub async fn create_member(
    State(state): State<AppState>,
    Json(mut member): Json<Member>,
) -> ApiResult<Member> {
    require(&member.full_name, "Full name")?;
    member.id = identity_or_new(&member.id);

    success(state.repo.create_member(&member).await?)
}

/// PUT /api/members/:id - Update a member.
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateMemberRequest>,
) -> ApiResult<Member> {
    if let Some(name) = &request.full_name {
        require(name, "Full name")?;
    }

    success(state.repo.update_member(&id, &request).await?)
}

/// DELETE /api/members/:id - Delete a member.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    state.repo.delete_member(&id).await?;
    success(MessageResponse::new("Deleted successfully"))
}
