//! Auth API routes

use axum::Router;
use axum_helpers::JwtAuth;
use domain_users::{PgUserRepository, UserRepository, UserService, handlers};

use crate::state::AppState;

/// Credential service backed by PostgreSQL
pub fn service(state: &AppState) -> UserService<PgUserRepository> {
    UserService::new(PgUserRepository::new(state.db.clone()))
}

/// Public `/register` and `/login` routes
pub fn router<R: UserRepository + 'static>(service: UserService<R>, jwt: JwtAuth) -> Router {
    handlers::router(service, jwt)
}
