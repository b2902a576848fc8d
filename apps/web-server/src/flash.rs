//! Session-scoped flash data.
//!
//! A `postboard_session` cookie carries a random session id. Flash payloads
//! live in the cache under `flash:<sid>` and are removed by the first read.

use std::sync::Arc;
use std::time::Duration;

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite};
use uuid::Uuid;

use postboard_core::ports::Cache;
use postboard_shared::Flash;

use crate::middleware::error::{AppError, AppResult};

pub const SESSION_COOKIE: &str = "postboard_session";

#[derive(Clone)]
pub struct FlashStore {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl FlashStore {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Read and clear the flash of the requesting session.
    pub async fn take(&self, req: &HttpRequest) -> Flash {
        let Some(sid) = session_id(req) else {
            return Flash::default();
        };

        match self.cache.take(&cache_key(&sid)).await {
            Some(raw) => Flash::from_json(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable flash data");
                Flash::default()
            }),
            None => Flash::default(),
        }
    }

    /// Store `flash` for the next request of this session.
    ///
    /// Returns the session cookie to set on the response; a new session id is
    /// issued when the request has none.
    pub async fn put(&self, req: &HttpRequest, flash: &Flash) -> AppResult<Cookie<'static>> {
        let sid = session_id(req).unwrap_or_else(|| Uuid::new_v4().to_string());

        let raw = flash
            .to_json()
            .map_err(|e| AppError::Internal(format!("flash serialization failed: {e}")))?;
        self.cache
            .set(&cache_key(&sid), &raw, Some(self.ttl))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(session_cookie(sid))
    }
}

fn cache_key(sid: &str) -> String {
    format!("flash:{sid}")
}

fn session_id(req: &HttpRequest) -> Option<String> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    Uuid::parse_str(cookie.value()).ok().map(|id| id.to_string())
}

fn session_cookie(sid: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, sid)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}
