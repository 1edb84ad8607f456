use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use std::path::PathBuf;
use std::time::Duration;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub jwt: JwtConfig,
    /// Directory holding `<SKU>.png` barcode images
    pub barcode_root: PathBuf,
    pub run_migrations: bool,
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080
        let database = PostgresConfig::from_env()?; // DATABASE_URL required
        let jwt = JwtConfig::from_env()?; // JWT_SECRET required

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            jwt,
            barcode_root: PathBuf::from(env_or_default("BARCODE_STORAGE_ROOT", "storage/barcodes")),
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
            shutdown_timeout: Duration::from_secs(env_parse("SHUTDOWN_TIMEOUT_SECS", "30")?),
        })
    }
}
