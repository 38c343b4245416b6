//! Account storage: users and pending password resets.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use shepherd_shared::models::{Role, User};

use super::Repository;
use crate::auth::constant_time_compare;
use crate::errors::AppError;

/// Changes to apply to an account; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct AccountChanges<'a> {
    pub email: Option<&'a str>,
    pub name: Option<&'a str>,
    pub role: Option<Role>,
    pub password_hash: Option<&'a str>,
}

impl Repository {
    // ==================== USER OPERATIONS ====================

    pub async fn count_users(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("total"))
    }

    /// List all accounts by id.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query("SELECT id, email, name, role FROM users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, email, name, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Look up an account and its password hash by email.
    pub async fn find_credentials(&self, email: &str) -> Result<Option<(User, String)>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, name, role, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| (user_from_row(&row), row.get("password_hash"))))
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let row = sqlx::query(
            "INSERT INTO users (email, password_hash, name, role) VALUES (?, ?, ?, ?) RETURNING id, email, name, role",
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    pub async fn update_user(&self, id: i64, changes: &AccountChanges<'_>) -> Result<User, AppError> {
        let row = sqlx::query(
            "UPDATE users SET email = COALESCE(?, email), name = COALESCE(?, name), role = COALESCE(?, role), password_hash = COALESCE(?, password_hash) WHERE id = ? RETURNING id, email, name, role",
        )
        .bind(changes.email)
        .bind(changes.name)
        .bind(changes.role.map(|r| r.as_str()))
        .bind(changes.password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(user_from_row)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    // ==================== PASSWORD RESET OPERATIONS ====================

    /// Store a reset digest for the account with `email`, replacing any pending one.
    ///
    /// Returns false when no such account exists.
    pub async fn store_password_reset(
        &self,
        email: &str,
        token_digest: &str,
        ttl_minutes: i64,
    ) -> Result<bool, AppError> {
        let expires_at = Utc::now().timestamp() + ttl_minutes * 60;

        let result = sqlx::query(
            "INSERT INTO password_resets (user_id, token_hash, expires_at) SELECT id, ?, ? FROM users WHERE email = ? ON CONFLICT(user_id) DO UPDATE SET token_hash = excluded.token_hash, expires_at = excluded.expires_at",
        )
        .bind(token_digest)
        .bind(expires_at)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the password of `email` if `token_digest` matches its pending,
    /// unexpired reset. The reset is consumed on success.
    pub async fn consume_password_reset(
        &self,
        email: &str,
        token_digest: &str,
        new_password_hash: &str,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let pending = sqlx::query(
            "SELECT r.user_id, r.token_hash, r.expires_at FROM password_resets r JOIN users u ON u.id = r.user_id WHERE u.email = ?",
        )
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(pending) = pending else {
            return Ok(false);
        };

        let user_id: i64 = pending.get("user_id");
        let stored: String = pending.get("token_hash");
        let expires_at: i64 = pending.get("expires_at");

        if !constant_time_compare(&stored, token_digest) || expires_at <= Utc::now().timestamp() {
            return Ok(false);
        }

        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(new_password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM password_resets WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

fn user_from_row(row: &SqliteRow) -> User {
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get::<Option<String>, _>("name").unwrap_or_default(),
        role: Role::parse(&role).unwrap_or_default(),
    }
}
