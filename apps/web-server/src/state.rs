//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use tera::Tera;

use postboard_core::ports::{
    Cache, PasswordService, PostRepository, TagAssociations, TagRepository, UniquenessChecker,
    UserRepository,
};
use postboard_infra::{
    Argon2PasswordService, DatabasePool, InMemoryCache, OrmPostRepository, OrmTagAssociations,
    OrmTagRepository, OrmUniquenessChecker, OrmUserRepository,
};

use crate::flash::FlashStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub post_tags: Arc<dyn TagAssociations>,
    pub uniqueness: Arc<dyn UniquenessChecker>,
    pub passwords: Arc<dyn PasswordService>,
    pub flash: FlashStore,
    pub views: Arc<Tera>,
    pub per_page: u64,
    pub pool: DatabasePool,
}

/// Knobs that are not part of the database wiring.
#[derive(Debug, Clone)]
pub struct StateOptions {
    pub per_page: u64,
    pub flash_ttl: Duration,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            per_page: 6,
            flash_ttl: Duration::from_secs(300),
        }
    }
}

impl AppState {
    /// Wire the SeaORM repositories around an open pool.
    pub fn from_pool(
        pool: DatabasePool,
        passwords: Arc<dyn PasswordService>,
        views: Tera,
        options: StateOptions,
    ) -> Self {
        let db = pool.main.clone();
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());

        tracing::info!(per_page = options.per_page, "Application state initialized");

        Self {
            users: Arc::new(OrmUserRepository::new(db.clone())),
            posts: Arc::new(OrmPostRepository::new(db.clone())),
            tags: Arc::new(OrmTagRepository::new(db.clone())),
            post_tags: Arc::new(OrmTagAssociations::new(db.clone())),
            uniqueness: Arc::new(OrmUniquenessChecker::new(db)),
            passwords,
            flash: FlashStore::new(cache, options.flash_ttl),
            views: Arc::new(views),
            per_page: options.per_page,
            pool,
        }
    }

    /// Production wiring with default Argon2 parameters.
    pub fn new(pool: DatabasePool, views: Tera, options: StateOptions) -> Self {
        Self::from_pool(pool, Arc::new(Argon2PasswordService::new()), views, options)
    }
}
