//! # Postboard Web Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use migration::{Migrator, MigratorTrait};
use tracing_actix_web::TracingLogger;

use postboard_infra::DatabasePool;

mod config;
mod flash;
mod forms;
mod handlers;
mod middleware;
mod state;
mod telemetry;
mod views;

use config::AppConfig;
use middleware::method_override::MethodOverride;
use state::{AppState, StateOptions};
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env()?;

    tracing::info!("Starting Postboard on {}:{}", config.host, config.port);

    let pool = DatabasePool::init(&config.database).await?;
    if config.auto_migrate {
        Migrator::up(&pool.main, None).await?;
        tracing::info!("Migrations applied");
    }

    let state = AppState::new(
        pool,
        views::load()?,
        StateOptions {
            per_page: config.posts_per_page,
            flash_ttl: config.flash_ttl,
        },
    );

    HttpServer::new(move || {
        App::new()
            .wrap(MethodOverride)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
