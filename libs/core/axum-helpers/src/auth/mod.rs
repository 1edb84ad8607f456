//! Bearer token authentication.
//!
//! - [`JwtAuth`] issues and validates HS256 tokens bound to a user id
//! - [`bearer_auth_middleware`] guards routes and inserts [`AuthUser`] into request extensions
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, bearer_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/products", get(list_products))
//!     .layer(axum::middleware::from_fn_with_state(auth, bearer_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{AuthError, AuthUser, IssuedToken, JwtAuth, JwtClaims};
pub use middleware::bearer_auth_middleware;
