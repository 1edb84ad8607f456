//! PostgreSQL connectivity for the warehouse services.
//!
//! - [`postgres`]: pooled connections with retry, migrations, health checks
//! - [`common`]: the shared error type and retry/backoff helpers
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use core_config::FromEnv;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "warehouse-api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
