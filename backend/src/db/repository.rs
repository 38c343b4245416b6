//! Database repository for CRUD operations.
//!
//! Every operation is a single parameterized statement. Inserts and updates
//! use `RETURNING` so the stored row comes back without a second query.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shepherd_shared::models::{
    AttendanceRecord, AttendanceStatus, Community, Contribution, ContributionType, Event, Member,
    MemberStatus, UpdateCommunityRequest, UpdateContributionRequest, UpdateEventRequest,
    UpdateMemberRequest,
};

use crate::errors::AppError;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== MEMBER OPERATIONS ====================

    /// List all members, newest identity first.
    pub async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        let rows = sqlx::query(
            "SELECT id, full_name, phone, email, address, passport_photo_url, status, assigned_community, join_date FROM members ORDER BY length(id) DESC, id DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    /// Insert a member under the caller-supplied id.
    pub async fn create_member(&self, member: &Member) -> Result<Member, AppError> {
        let row = sqlx::query(
            "INSERT INTO members (id, full_name, phone, email, address, passport_photo_url, status, assigned_community, join_date) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id, full_name, phone, email, address, passport_photo_url, status, assigned_community, join_date"
        )
        .bind(&member.id)
        .bind(&member.full_name)
        .bind(&member.phone)
        .bind(&member.email)
        .bind(&member.address)
        .bind(&member.passport_photo_url)
        .bind(member.status.as_str())
        .bind(&member.assigned_community)
        .bind(&member.join_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(member_from_row(&row))
    }

    /// Update the supplied fields of a member. Nullable columns take an
    /// explicit `null` as a request to clear them.
    pub async fn update_member(
        &self,
        id: &str,
        request: &UpdateMemberRequest,
    ) -> Result<Member, AppError> {
        let row = sqlx::query(
            "UPDATE members SET full_name = COALESCE(?, full_name), phone = COALESCE(?, phone), email = COALESCE(?, email), address = CASE WHEN ? THEN ? ELSE address END, passport_photo_url = CASE WHEN ? THEN ? ELSE passport_photo_url END, status = COALESCE(?, status), assigned_community = COALESCE(?, assigned_community), join_date = COALESCE(?, join_date) WHERE id = ? RETURNING id, full_name, phone, email, address, passport_photo_url, status, assigned_community, join_date"
        )
        .bind(&request.full_name)
        .bind(&request.phone)
        .bind(&request.email)
        .bind(request.address.is_some())
        .bind(request.address.clone().flatten())
        .bind(request.passport_photo_url.is_some())
        .bind(request.passport_photo_url.clone().flatten())
        .bind(request.status.map(|s| s.as_str()))
        .bind(&request.assigned_community)
        .bind(&request.join_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(member_from_row)
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))
    }

    /// Delete a member.
    pub async fn delete_member(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member {} not found", id)));
        }
        Ok(())
    }

    // ==================== COMMUNITY OPERATIONS ====================

    /// List all communities by name.
    pub async fn list_communities(&self) -> Result<Vec<Community>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, host_name, location, meeting_day, max_capacity FROM communities ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(community_from_row).collect())
    }

    pub async fn create_community(&self, community: &Community) -> Result<Community, AppError> {
        let row = sqlx::query(
            "INSERT INTO communities (id, name, host_name, location, meeting_day, max_capacity) VALUES (?, ?, ?, ?, ?, ?) RETURNING id, name, host_name, location, meeting_day, max_capacity"
        )
        .bind(&community.id)
        .bind(&community.name)
        .bind(&community.host_name)
        .bind(&community.location)
        .bind(&community.meeting_day)
        .bind(community.max_capacity)
        .fetch_one(&self.pool)
        .await?;

        Ok(community_from_row(&row))
    }

    /// Update a community. Renaming does not touch members assigned under the old name.
    pub async fn update_community(
        &self,
        id: &str,
        request: &UpdateCommunityRequest,
    ) -> Result<Community, AppError> {
        let row = sqlx::query(
            "UPDATE communities SET name = COALESCE(?, name), host_name = COALESCE(?, host_name), location = COALESCE(?, location), meeting_day = COALESCE(?, meeting_day), max_capacity = COALESCE(?, max_capacity) WHERE id = ? RETURNING id, name, host_name, location, meeting_day, max_capacity"
        )
        .bind(&request.name)
        .bind(&request.host_name)
        .bind(&request.location)
        .bind(&request.meeting_day)
        .bind(request.max_capacity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(community_from_row)
            .ok_or_else(|| AppError::NotFound(format!("Community {} not found", id)))
    }

    pub async fn delete_community(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM communities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Community {} not found", id)));
        }
        Ok(())
    }

    // ==================== EVENT OPERATIONS ====================

    /// List all events, most recent date first.
    pub async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, date, type, responsible_community, location, start_date, start_time, end_date, end_time FROM events ORDER BY date DESC, id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(event_from_row).collect())
    }

    pub async fn create_event(&self, event: &Event) -> Result<Event, AppError> {
        let row = sqlx::query(
            "INSERT INTO events (id, name, date, type, responsible_community, location, start_date, start_time, end_date, end_time) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id, name, date, type, responsible_community, location, start_date, start_time, end_date, end_time"
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.date)
        .bind(&event.event_type)
        .bind(&event.responsible_community)
        .bind(&event.location)
        .bind(&event.start_date)
        .bind(&event.start_time)
        .bind(&event.end_date)
        .bind(&event.end_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(event_from_row(&row))
    }

    pub async fn update_event(
        &self,
        id: &str,
        request: &UpdateEventRequest,
    ) -> Result<Event, AppError> {
        let row = sqlx::query(
            "UPDATE events SET name = COALESCE(?, name), date = COALESCE(?, date), type = COALESCE(?, type), responsible_community = COALESCE(?, responsible_community), location = CASE WHEN ? THEN ? ELSE location END, start_date = CASE WHEN ? THEN ? ELSE start_date END, start_time = CASE WHEN ? THEN ? ELSE start_time END, end_date = CASE WHEN ? THEN ? ELSE end_date END, end_time = CASE WHEN ? THEN ? ELSE end_time END WHERE id = ? RETURNING id, name, date, type, responsible_community, location, start_date, start_time, end_date, end_time"
        )
        .bind(&request.name)
        .bind(&request.date)
        .bind(&request.event_type)
        .bind(&request.responsible_community)
        .bind(request.location.is_some())
        .bind(request.location.clone().flatten())
        .bind(request.start_date.is_some())
        .bind(request.start_date.clone().flatten())
        .bind(request.start_time.is_some())
        .bind(request.start_time.clone().flatten())
        .bind(request.end_date.is_some())
        .bind(request.end_date.clone().flatten())
        .bind(request.end_time.is_some())
        .bind(request.end_time.clone().flatten())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(event_from_row)
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        Ok(())
    }

    // ==================== ATTENDANCE OPERATIONS ====================

    /// List the attendance log in insertion order.
    pub async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, AppError> {
        let rows =
            sqlx::query("SELECT date, event_name, member_name, status FROM attendance ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(attendance_from_row).collect())
    }

    /// Append an attendance mark. Duplicates are accepted.
    pub async fn create_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> Result<AttendanceRecord, AppError> {
        let row = sqlx::query(
            "INSERT INTO attendance (date, event_name, member_name, status) VALUES (?, ?, ?, ?) RETURNING date, event_name, member_name, status"
        )
        .bind(&record.date)
        .bind(&record.event_name)
        .bind(&record.member_name)
        .bind(record.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(attendance_from_row(&row))
    }

    // ==================== CONTRIBUTION OPERATIONS ====================

    /// List contributions, most recent date first.
    pub async fn list_contributions(&self) -> Result<Vec<Contribution>, AppError> {
        let rows = sqlx::query(
            "SELECT id, date, member_name, amount, type FROM contributions ORDER BY date DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(contribution_from_row).collect())
    }

    pub async fn create_contribution(
        &self,
        contribution: &Contribution,
    ) -> Result<Contribution, AppError> {
        let row = sqlx::query(
            "INSERT INTO contributions (id, date, member_name, amount, type) VALUES (?, ?, ?, ?, ?) RETURNING id, date, member_name, amount, type"
        )
        .bind(&contribution.id)
        .bind(&contribution.date)
        .bind(&contribution.member_name)
        .bind(contribution.amount)
        .bind(contribution.contribution_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(contribution_from_row(&row))
    }

    pub async fn update_contribution(
        &self,
        id: &str,
        request: &UpdateContributionRequest,
    ) -> Result<Contribution, AppError> {
        let row = sqlx::query(
            "UPDATE contributions SET date = COALESCE(?, date), member_name = COALESCE(?, member_name), amount = COALESCE(?, amount), type = COALESCE(?, type) WHERE id = ? RETURNING id, date, member_name, amount, type"
        )
        .bind(&request.date)
        .bind(&request.member_name)
        .bind(request.amount)
        .bind(request.contribution_type.map(|t| t.as_str()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(contribution_from_row)
            .ok_or_else(|| AppError::NotFound(format!("Contribution {} not found", id)))
    }
}

// ==================== ROW MAPPERS ====================

fn text(row: &SqliteRow, column: &str) -> String {
    row.get::<Option<String>, _>(column).unwrap_or_default()
}

/// Decode a stored enum label, falling back to the default for unknown text.
fn label<T: Default>(row: &SqliteRow, column: &str, parse: fn(&str) -> Option<T>) -> T {
    let raw = text(row, column);
    parse(&raw).unwrap_or_else(|| {
        tracing::warn!("Unknown {} value {:?}; using default", column, raw);
        T::default()
    })
}

fn member_from_row(row: &SqliteRow) -> Member {
    Member {
        id: row.get("id"),
        full_name: row.get("full_name"),
        phone: text(row, "phone"),
        email: text(row, "email"),
        address: row.get("address"),
        passport_photo_url: row.get("passport_photo_url"),
        status: label(row, "status", MemberStatus::parse),
        assigned_community: text(row, "assigned_community"),
        join_date: text(row, "join_date"),
    }
}

fn community_from_row(row: &SqliteRow) -> Community {
    Community {
        id: row.get("id"),
        name: row.get("name"),
        host_name: text(row, "host_name"),
        location: text(row, "location"),
        meeting_day: text(row, "meeting_day"),
        max_capacity: row.get("max_capacity"),
    }
}

fn event_from_row(row: &SqliteRow) -> Event {
    Event {
        id: row.get("id"),
        name: row.get("name"),
        date: text(row, "date"),
        event_type: text(row, "type"),
        responsible_community: text(row, "responsible_community"),
        location: row.get("location"),
        start_date: row.get("start_date"),
        start_time: row.get("start_time"),
        end_date: row.get("end_date"),
        end_time: row.get("end_time"),
    }
}

fn attendance_from_row(row: &SqliteRow) -> AttendanceRecord {
    AttendanceRecord {
        date: row.get("date"),
        event_name: row.get("event_name"),
        member_name: row.get("member_name"),
        status: label(row, "status", AttendanceStatus::parse),
    }
}

fn contribution_from_row(row: &SqliteRow) -> Contribution {
    Contribution {
        id: row.get("id"),
        date: row.get("date"),
        member_name: row.get("member_name"),
        amount: row.get("amount"),
        contribution_type: label(row, "type", ContributionType::parse),
    }
}
