//! Attendance API endpoints. The log is append-only.

use axum::{extract::State, Json};
use shepherd_shared::models::AttendanceRecord;

use super::{require, success, ApiResult};
use crate::AppState;

/// GET /api/attendance - List the attendance log.
pub async fn list_attendance(State(state): State<AppState>) -> ApiResult<Vec<AttendanceRecord>> {
    success(state.repo.list_attendance().await?)
}

/// POST /api/attendance - Record one attendance mark.
pub async fn create_attendance(
    State(state): State<AppState>,
    Json(record): Json<AttendanceRecord>,
) -> ApiResult<AttendanceRecord> {
    require(&record.event_name, "Event name")?;
    require(&record.member_name, "Member name")?;

    success(state.repo.create_attendance(&record).await?)
}
