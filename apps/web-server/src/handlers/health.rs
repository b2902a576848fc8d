//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - reports server and database status.
///
/// GET /health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match state.pool.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "Database ping failed");
            "unavailable"
        }
    };

    let response = HealthResponse {
        status: if database == "ok" { "ok" } else { "degraded" },
        database,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if database == "ok" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
