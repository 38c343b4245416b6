//! User management endpoints (admin only).

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use shepherd_shared::models::{CreateUserRequest, MessageResponse, UpdateUserRequest, User};

use super::{require, success, ApiResult};
use crate::auth::{hash_password, AuthUser};
use crate::db::AccountChanges;
use crate::errors::AppError;
use crate::AppState;

/// GET /api/users - List all accounts.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    success(state.repo.list_users().await?)
}

/// POST /api/users - Create an account; role defaults to `user`.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<User> {
    require(&request.email, "Email")?;
    require(&request.password, "Password")?;

    let password_hash = hash_password(&request.password)?;
    let user = state
        .repo
        .create_user(
            request.email.trim(),
            &password_hash,
            &request.name,
            request.role.unwrap_or_default(),
        )
        .await?;

    tracing::info!("Created user {} with role {}", user.id, user.role.as_str());
    success(user)
}

/// PUT /api/users/:id - Update an account. The password is re-hashed only when supplied.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    if let Some(email) = &request.email {
        require(email, "Email")?;
    }

    let password_hash = match request.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let changes = AccountChanges {
        email: request.email.as_deref().map(str::trim),
        name: request.name.as_deref(),
        role: request.role,
        password_hash: password_hash.as_deref(),
    };

    success(state.repo.update_user(id, &changes).await?)
}

/// DELETE /api/users/:id - Delete an account other than the caller's own.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<MessageResponse> {
    if id == caller.id {
        return Err(AppError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    state.repo.delete_user(id).await?;
    tracing::info!("User {} deleted by {}", id, caller.id);
    success(MessageResponse::new("User deleted successfully"))
}
