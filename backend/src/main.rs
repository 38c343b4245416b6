//! Shepherd backend server binary.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shepherd_backend::config::{Config, DEV_JWT_SECRET};
use shepherd_backend::db::{self, Repository};
use shepherd_backend::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shepherd backend");
    tracing::info!("Database: {:?}", config.database);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("JWT_SECRET is not set; using the development signing secret");
    }

    // Initialize database
    let pool = db::init_database(&config.database).await?;
    let repo = Arc::new(Repository::new(pool));

    if let Some(password) = db::bootstrap_admin(&repo, &config).await? {
        tracing::warn!(
            "Generated password for {}: {} (set SHEPHERD_ADMIN_PASSWORD to choose one)",
            config.admin_email,
            password
        );
    }

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
