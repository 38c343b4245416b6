//! Bearer-token authentication and role gating.

mod credentials;
mod token;

pub use credentials::*;
pub use token::*;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use shepherd_shared::models::Role;
use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::AppState;

/// Session middleware: a missing token is 401, a token that fails
/// verification is 403. On success the [`AuthUser`] is attached to the request.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = decode_token(token, &state.config.jwt_secret).map_err(|e| {
        tracing::debug!("Token validation failed: {}", e);
        AppError::Forbidden(format!("Invalid or expired token: {}", e))
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Admin gate; must run inside [`require_session`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.role == Role::Admin => Ok(next.run(request).await),
        _ => Err(AppError::Forbidden(
            "Access denied: Admin privileges required".to_string(),
        )),
    }
}

/// Perform constant-time string comparison.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("digest-123", "digest-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("digest-123", "digest-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-digest"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }
}
