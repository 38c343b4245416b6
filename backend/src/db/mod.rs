//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data.

mod accounts;
mod repository;

pub use accounts::AccountChanges;
pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use shepherd_shared::models::Role;

use crate::auth::{generate_password, hash_password};
use crate::config::{Config, DatabaseTarget};
use crate::errors::AppError;

/// Initialize the database connection pool and create the schema.
pub async fn init_database(target: &DatabaseTarget) -> Result<SqlitePool, sqlx::Error> {
    let options = match target {
        DatabaseTarget::Url(url) => SqliteConnectOptions::from_str(url)?,
        DatabaseTarget::Path(path) => {
            // Ensure the parent directory exists
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            SqliteConnectOptions::new().filename(path)
        }
    };

    let options = options
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create tables and indexes if they don't exist.
async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            phone TEXT,
            email TEXT,
            address TEXT,
            passport_photo_url TEXT,
            status TEXT NOT NULL DEFAULT 'Active',
            assigned_community TEXT,
            join_date TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS communities (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            host_name TEXT,
            location TEXT,
            meeting_day TEXT,
            max_capacity INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            date TEXT,
            type TEXT,
            responsible_community TEXT,
            location TEXT,
            start_date TEXT,
            start_time TEXT,
            end_date TEXT,
            end_time TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            event_name TEXT NOT NULL,
            member_name TEXT NOT NULL,
            status TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contributions (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            member_name TEXT NOT NULL,
            amount REAL NOT NULL,
            type TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            name TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS password_resets (
            user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            token_hash TEXT NOT NULL,
            expires_at INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes for the name-based lookups the client performs
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_members_full_name ON members(full_name);
        CREATE INDEX IF NOT EXISTS idx_members_assigned_community ON members(assigned_community);
        CREATE INDEX IF NOT EXISTS idx_attendance_event_date ON attendance(event_name, date);
        CREATE INDEX IF NOT EXISTS idx_attendance_member_name ON attendance(member_name);
        CREATE INDEX IF NOT EXISTS idx_contributions_member_name ON contributions(member_name);
        CREATE INDEX IF NOT EXISTS idx_contributions_date ON contributions(date);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the first admin account when the users table is empty.
///
/// Returns the generated password when none was configured.
pub async fn bootstrap_admin(
    repo: &Repository,
    config: &Config,
) -> Result<Option<String>, AppError> {
    if repo.count_users().await? > 0 {
        return Ok(None);
    }

    let (password, generated) = match &config.admin_password {
        Some(password) => (password.clone(), false),
        None => (generate_password(), true),
    };

    let hash = hash_password(&password)?;
    repo.create_user(&config.admin_email, &hash, "Administrator", Role::Admin)
        .await?;
    tracing::info!("Created admin account {}", config.admin_email);

    Ok(generated.then_some(password))
}
