//! Warehouse inventory API

use axum_helpers::JwtAuth;
use axum_helpers::server::{create_production_app, create_router, health_router};
use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use database::postgres::PostgresConfig;
use migration::Migrator;
use tracing::info;

mod api;
mod config;
mod state;

use config::Config;
use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "warehouse-api", version, about = "Warehouse inventory REST API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Migrate => migrate().await,
    }
}

async fn migrate() -> eyre::Result<()> {
    init_tracing(&Environment::from_env());

    let database = PostgresConfig::from_env()?;
    let db = database::postgres::connect_from_config_with_retry(database, None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<Migrator>(&db, "warehouse-api").await?;
    db.close().await?;
    Ok(())
}

async fn serve() -> eyre::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<Migrator>(&db, "warehouse-api").await?;
    }

    tokio::fs::create_dir_all(&config.barcode_root).await?;
    info!(root = %config.barcode_root.display(), "Barcode storage ready");

    let jwt = JwtAuth::new(&config.jwt);
    let state = AppState { config, db, jwt };

    // /health: liveness with app name/version; /ready: database probe
    let probes = health_router(state.config.app).merge(api::ready_router(state.clone()));
    let app = create_router(api::routes(&state), probes);

    info!(
        "Starting warehouse API ({:?} shutdown timeout)",
        state.config.shutdown_timeout
    );

    let server_config = state.config.server.clone();
    let shutdown_timeout = state.config.shutdown_timeout;

    create_production_app(app, &server_config, shutdown_timeout, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Warehouse API shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["warehouse-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_migrate_subcommand() {
        let cli = Cli::try_parse_from(["warehouse-api", "migrate"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Migrate)));
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["warehouse-api", "explode"]).is_err());
    }
}
