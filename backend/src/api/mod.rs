//! REST API module.
//!
//! One submodule per entity group; every handler returns the JSON envelope below.

mod attendance;
mod auth;
mod communities;
mod contributions;
mod events;
mod members;
mod users;

pub use attendance::*;
pub use auth::*;
pub use communities::*;
pub use contributions::*;
pub use events::*;
pub use members::*;
pub use users::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Reject blank required text fields.
fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Keep the caller's identity string, or mint one when it is blank.
fn identity_or_new(id: &str) -> String {
    let id = id.trim();
    if id.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_whitespace() {
        assert!(require("  ", "Name").is_err());
        assert!(require("Upendo", "Name").is_ok());
    }

    #[test]
    fn test_identity_kept_or_generated() {
        assert_eq!(identity_or_new(" M042 "), "M042");
        let generated = identity_or_new("");
        assert!(uuid::Uuid::parse_str(&generated).is_ok());
    }
}
