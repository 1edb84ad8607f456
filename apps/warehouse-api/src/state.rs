//! Application state management.

use axum_helpers::JwtAuth;

/// Shared application state, cloned into handlers and routers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Token service shared by login and the bearer middleware
    pub jwt: JwtAuth,
}
