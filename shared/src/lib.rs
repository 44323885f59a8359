use crate::error::{ConfigError, InitializationError};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

pub const ENV_VAR_PREFIX: &str = "STATION_API__";
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub postgres: Option<PostgresConfig>,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub uploads_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Optional data loaded into the store at startup.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    /// JSON file holding an array of station documents.
    pub stations_file: Option<PathBuf>,
}

pub fn figment() -> Figment {
    Figment::new()
        .merge(Toml::file(SETTINGS_FILE))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    Ok(figment().extract::<Config>()?)
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Migration(#[from] sqlx::migrate::MigrateError),
        #[error(transparent)]
        Db(#[from] sqlx::Error),
    }
}

#[instrument(skip_all)]
pub async fn initialize_db(
    pg_config: &PostgresConfig,
    migrate: bool,
) -> Result<Pool<Postgres>, InitializationError> {
    let pool = PgPoolOptions::new()
        .max_connections(pg_config.max_connections)
        .connect(&pg_config.connection_string)
        .await?;

    info!(name: "db.connected", "db pool created and connected");

    // Run any new migrations
    if migrate {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(name: "db.migrated", "db migrations applied");
    }

    Ok(pool)
}

/// Resolves once the process is asked to stop with Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C only");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = signal::ctrl_c() => info!(name: "signal.ctrlc.received", "Ctrl+C received, shutting down"),
        _ = terminate => info!(name: "signal.sigterm.received", "SIGTERM received, shutting down"),
    }
}

pub fn init_tracing() -> Result<(), InitializationError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_settings_file() {
        Jail::expect_with(|_jail| {
            let config: Config = figment().extract()?;
            assert_eq!(config.server.listen_addr, "0.0.0.0:3000");
            assert_eq!(config.server.uploads_dir, PathBuf::from("uploads"));
            assert!(config.postgres.is_none());
            assert!(config.seed.stations_file.is_none());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_settings_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                SETTINGS_FILE,
                r#"
                [server]
                listen_addr = "127.0.0.1:4000"

                [postgres]
                connection_string = "postgres://localhost/railway"
                "#,
            )?;
            jail.set_env("STATION_API__SERVER__LISTEN_ADDR", "127.0.0.1:5000");
            jail.set_env("STATION_API__POSTGRES__MAX_CONNECTIONS", "12");

            let config: Config = figment().extract()?;
            assert_eq!(config.server.listen_addr, "127.0.0.1:5000");
            let postgres = config.postgres.expect("postgres section present");
            assert_eq!(postgres.connection_string, "postgres://localhost/railway");
            assert_eq!(postgres.max_connections, 12);
            Ok(())
        });
    }
}
