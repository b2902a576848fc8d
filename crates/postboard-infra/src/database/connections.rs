use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr};

use postboard_core::error::RepoError;

use super::base::db_error;

/// Configuration for the application database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    /// A single-connection in-memory SQLite database, used by tests.
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            sqlx_logging: false,
        }
    }
}

/// Connection pool shared by every repository.
#[derive(Clone)]
pub struct DatabasePool {
    pub main: DbConn,
}

impl DatabasePool {
    /// Open the pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection pool...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(config.sqlx_logging)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!(
            max_connections = config.max_connections,
            backend = ?main.get_database_backend(),
            "Database connected"
        );

        Ok(Self { main })
    }

    /// Round-trip to the database.
    pub async fn ping(&self) -> Result<(), RepoError> {
        self.main.ping().await.map_err(db_error)
    }
}
