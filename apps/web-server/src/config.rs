//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use postboard_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    /// Run pending migrations before serving.
    pub auto_migrate: bool,
    pub posts_per_page: u64,
    pub flash_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let database = DatabaseConfig {
            url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 20)?,
            min_connections: parse_or("DB_MIN_CONNECTIONS", 2)?,
            sqlx_logging: false,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080)?,
            database,
            auto_migrate: flag("DB_AUTO_MIGRATE"),
            posts_per_page: parse_or("POSTS_PER_PAGE", 6)?.max(1),
            flash_ttl: Duration::from_secs(parse_or("FLASH_TTL_SECS", 300)?),
        })
    }
}

/// Parse `key`, falling back to `default` when unset. A set but malformed value is an error.
fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
