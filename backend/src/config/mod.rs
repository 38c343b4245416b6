//! Configuration module for the Shepherd backend.
//!
//! All configuration is loaded from environment variables (and `.env`) with
//! defaults suited to local development.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Signing secret used in development when `JWT_SECRET` is unset.
pub const DEV_JWT_SECRET: &str = "dev-only-jwt-secret-change-me";

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// A full sqlx connection string, e.g. `sqlite://data/app.sqlite?mode=rwc`
    Url(String),
    /// A database file; parent directories are created on startup
    Path(PathBuf),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection string or file path
    pub database: DatabaseTarget,
    /// Secret used to sign session tokens
    pub jwt_secret: String,
    /// Session token lifetime
    pub token_ttl_hours: i64,
    /// Lifetime of password reset tokens
    pub reset_ttl_minutes: i64,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Email of the admin account created when no accounts exist
    pub admin_email: String,
    /// Password for that account; generated when absent
    pub admin_password: Option<String>,
    /// Write issued reset tokens to the log. Only for development, while
    /// no mail transport exists.
    pub log_reset_tokens: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, BoxError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = get("SHEPHERD_ENV").unwrap_or_else(|| "development".to_string());

        let database = match get("DATABASE_URL") {
            Some(url) => DatabaseTarget::Url(url),
            None => DatabaseTarget::Path(
                get("SHEPHERD_DB_PATH")
                    .unwrap_or_else(|| "./data/shepherd.sqlite".to_string())
                    .into(),
            ),
        };

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if environment == "development" => DEV_JWT_SECRET.to_string(),
            None => return Err(format!("JWT_SECRET must be set in {environment}").into()),
        };

        let token_ttl_hours = match get("SHEPHERD_TOKEN_TTL_HOURS") {
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| format!("Invalid SHEPHERD_TOKEN_TTL_HOURS: {v}"))?,
            None => 12,
        };

        let reset_ttl_minutes = match get("SHEPHERD_RESET_TTL_MINUTES") {
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| format!("Invalid SHEPHERD_RESET_TTL_MINUTES: {v}"))?,
            None => 60,
        };

        let log_reset_tokens = match get("SHEPHERD_LOG_RESET_TOKENS").as_deref() {
            None | Some("0") | Some("false") => false,
            Some("1") | Some("true") if environment == "development" => true,
            Some("1") | Some("true") => {
                return Err(
                    format!("SHEPHERD_LOG_RESET_TOKENS is only allowed in development, not {environment}").into(),
                )
            }
            Some(other) => return Err(format!("Invalid SHEPHERD_LOG_RESET_TOKENS: {other}").into()),
        };

        let bind_addr = get("SHEPHERD_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3002".to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| format!("Invalid SHEPHERD_BIND_ADDR format: {bind_addr}"))?;

        Ok(Self {
            database,
            jwt_secret,
            token_ttl_hours,
            reset_ttl_minutes,
            bind_addr,
            log_level: get("SHEPHERD_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            admin_email: get("SHEPHERD_ADMIN_EMAIL")
                .unwrap_or_else(|| "admin@shepherd.local".to_string()),
            admin_password: get("SHEPHERD_ADMIN_PASSWORD"),
            log_reset_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(
            config.database,
            DatabaseTarget::Path(PathBuf::from("./data/shepherd.sqlite"))
        );
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.token_ttl_hours, 12);
        assert_eq!(config.reset_ttl_minutes, 60);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3002");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.admin_email, "admin@shepherd.local");
        assert!(config.admin_password.is_none());
        assert!(!config.log_reset_tokens);
    }

    #[test]
    fn test_reset_token_logging_is_development_only() {
        let config =
            Config::from_lookup(lookup(&[("SHEPHERD_LOG_RESET_TOKENS", "true")])).unwrap();
        assert!(config.log_reset_tokens);

        let result = Config::from_lookup(lookup(&[
            ("SHEPHERD_ENV", "production"),
            ("JWT_SECRET", "s3cret"),
            ("SHEPHERD_LOG_RESET_TOKENS", "1"),
        ]));
        assert!(result.is_err());

        assert!(Config::from_lookup(lookup(&[("SHEPHERD_LOG_RESET_TOKENS", "maybe")])).is_err());
    }

    #[test]
    fn test_database_url_wins_over_path() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SHEPHERD_DB_PATH", "/tmp/ignored.sqlite"),
        ]))
        .unwrap();
        assert_eq!(config.database, DatabaseTarget::Url("sqlite::memory:".into()));
    }

    #[test]
    fn test_production_requires_secret() {
        let result = Config::from_lookup(lookup(&[("SHEPHERD_ENV", "production")]));
        assert!(result.is_err());

        let config = Config::from_lookup(lookup(&[
            ("SHEPHERD_ENV", "production"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn test_invalid_bind_addr_is_an_error() {
        assert!(Config::from_lookup(lookup(&[("SHEPHERD_BIND_ADDR", "nope")])).is_err());
    }
}
