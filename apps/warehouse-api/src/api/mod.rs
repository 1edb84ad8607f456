//! API routes module

pub mod auth;
pub mod health;
pub mod products;

use axum::Router;
use axum_helpers::JwtAuth;
use domain_products::{ProductRepository, ProductService};
use domain_users::{UserRepository, UserService};

use crate::state::AppState;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by `axum_helpers::create_router`.
pub fn routes(state: &AppState) -> Router {
    compose(
        auth::service(state),
        products::service(state),
        state.jwt.clone(),
    )
}

/// Wire services into the public auth and bearer-protected product routes
pub fn compose<U, P>(users: UserService<U>, products: ProductService<P>, jwt: JwtAuth) -> Router
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
{
    Router::new()
        .nest("/auth", auth::router(users, jwt.clone()))
        .nest("/products", products::router(products, jwt))
}

/// Creates the /ready router that checks the database connection.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
