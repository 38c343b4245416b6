//! Contribution API endpoints. Contributions can be corrected but not deleted.

use axum::{
    extract::{Path, State},
    Json,
};
use shepherd_shared::models::{Contribution, UpdateContributionRequest};

use super::{identity_or_new, require, success, ApiResult};
use crate::errors::AppError;
use crate::AppState;

fn check_amount(amount: f64) -> Result<(), AppError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::Validation(
            "Amount must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/contributions - List all contributions.
pub async fn list_contributions(State(state): State<AppState>) -> ApiResult<Vec<Contribution>> {
    success(state.repo.list_contributions().await?)
}

/// POST /api/contributions - Record a contribution.
pub async fn create_contribution(
    State(state): State<AppState>,
    Json(mut contribution): Json<Contribution>,
) -> ApiResult<Contribution> {
    require(&contribution.member_name, "Member name")?;
    check_amount(contribution.amount)?;
    contribution.id = identity_or_new(&contribution.id);

    success(state.repo.create_contribution(&contribution).await?)
}

/// PUT /api/contributions/:id - Correct a contribution.
pub async fn update_contribution(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateContributionRequest>,
) -> ApiResult<Contribution> {
    if let Some(name) = &request.member_name {
        require(name, "Member name")?;
    }
    if let Some(amount) = request.amount {
        check_amount(amount)?;
    }

    success(state.repo.update_contribution(&id, &request).await?)
}
