//! Shepherd Backend
//!
//! REST backend for congregation management: members, communities, events,
//! attendance, contributions and user accounts, persisted in SQLite.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Account management, admins only
    let admin_routes = Router::new()
        .route("/users", get(api::list_users).post(api::create_user))
        .route("/users/{id}", put(api::update_user).delete(api::delete_user))
        .route_layer(middleware::from_fn(auth::require_admin));

    // Everything below requires a valid session token
    let protected_routes = Router::new()
        .route("/auth/me", get(api::me))
        // Members
        .route("/members", get(api::list_members).post(api::create_member))
        .route(
            "/members/{id}",
            put(api::update_member).delete(api::delete_member),
        )
        // Communities
        .route(
            "/communities",
            get(api::list_communities).post(api::create_community),
        )
        .route(
            "/communities/{id}",
            put(api::update_community).delete(api::delete_community),
        )
        // Events
        .route("/events", get(api::list_events).post(api::create_event))
        .route(
            "/events/{id}",
            put(api::update_event).delete(api::delete_event),
        )
        // Attendance is append-only
        .route(
            "/attendance",
            get(api::list_attendance).post(api::create_attendance),
        )
        // Contributions
        .route(
            "/contributions",
            get(api::list_contributions).post(api::create_contribution),
        )
        .route("/contributions/{id}", put(api::update_contribution))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let public_routes = Router::new()
        .route("/auth/login", post(api::login))
        .route("/auth/forgot-password", post(api::forgot_password))
        .route("/auth/reset-password", post(api::reset_password));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
