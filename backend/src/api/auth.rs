//! Authentication endpoints.

use axum::{extract::State, Extension, Json};
use shepherd_shared::models::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
    User,
};

use super::{require, success, ApiResult};
use crate::auth::{
    digest_reset_token, generate_reset_token, hash_password, issue_token, verify_credentials,
    AuthUser,
};
use crate::errors::AppError;
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const RESET_REQUESTED: &str = "If an account exists, a reset link has been sent.";

/// POST /api/auth/login - Exchange email and password for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let credentials = state.repo.find_credentials(&request.email).await?;
    let verified = verify_credentials(
        &request.password,
        credentials.as_ref().map(|(_, hash)| hash.as_str()),
    );

    let user = match credentials {
        Some((user, _)) if verified => user,
        Some((user, _)) => {
            tracing::debug!("Login with wrong password for user {}", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        None => {
            tracing::debug!("Login for unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;
    tracing::info!("User {} logged in", user.id);

    success(LoginResponse { token, user })
}

/// GET /api/auth/me - The account behind the presented token.
pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<User> {
    match state.repo.get_user(caller.id).await? {
        Some(user) => success(user),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}

/// POST /api/auth/forgot-password - Start a password reset.
///
/// The response is identical whether or not the account exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> ApiResult<MessageResponse> {
    let token = generate_reset_token();
    let issued = state
        .repo
        .store_password_reset(
            &request.email,
            &digest_reset_token(&token),
            state.config.reset_ttl_minutes,
        )
        .await?;

    if issued {
        // TODO: deliver the token by email once an outbound mail transport is configured.
        tracing::info!("Password reset token issued");
        if state.config.log_reset_tokens {
            tracing::warn!(email = %request.email, token = %token, "Password reset token");
        }
    } else {
        tracing::debug!("Password reset requested for unknown email");
    }

    success(MessageResponse::new(RESET_REQUESTED))
}

/// POST /api/auth/reset-password - Finish a reset with the issued token.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<MessageResponse> {
    require(&request.new_password, "New password")?;
    if request.token.trim().is_empty() {
        return Err(AppError::Validation(
            "Invalid or expired reset token".to_string(),
        ));
    }

    let new_hash = hash_password(&request.new_password)?;
    let updated = state
        .repo
        .consume_password_reset(
            &request.email,
            &digest_reset_token(request.token.trim()),
            &new_hash,
        )
        .await?;

    if !updated {
        return Err(AppError::Validation(
            "Invalid or expired reset token".to_string(),
        ));
    }

    tracing::info!("Password reset completed");
    success(MessageResponse::new("Password updated successfully"))
}
