use crate::config::AppConfig;
use crate::migrator::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

/// Establishes a connection pool to the database with default pool options.
pub async fn establish_connection(database_url: &str) -> Result<DbPool, DbErr> {
    let config = DbConfig {
        url: database_url.to_string(),
        ..Default::default()
    };

    establish_connection_with_config(&config).await
}

/// Establishes a connection pool with explicit pool options.
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.acquire_timeout)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connection established");
    Ok(db)
}

/// Establishes a connection using the pool knobs from [`AppConfig`].
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, DbErr> {
    let config = DbConfig {
        url: cfg.database_url.clone(),
        max_connections: cfg.db_max_connections,
        min_connections: cfg.db_min_connections,
        connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
        idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
        acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
    };

    establish_connection_with_config(&config).await
}

/// Runs all pending migrations.
pub async fn run_migrations(db: &DbPool) -> Result<(), DbErr> {
    info!("Running database migrations");
    Migrator::up(db, None).await
}

/// Lightweight connectivity check used by the health endpoint.
pub async fn ping(db: &DbPool) -> Result<(), DbErr> {
    db.ping().await
}
