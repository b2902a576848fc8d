//! # Postboard Infrastructure
//!
//! Concrete implementations of the ports defined in `postboard-core`:
//! SeaORM repositories, Argon2 password hashing and the in-memory session cache.

pub mod auth;
pub mod cache;
pub mod database;

pub use auth::Argon2PasswordService;
pub use cache::InMemoryCache;
pub use database::{
    DatabaseConfig, DatabasePool, OrmPostRepository, OrmTagAssociations, OrmTagRepository,
    OrmUniquenessChecker, OrmUserRepository,
};
