//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod repository;

pub use auth::{AuthError, PasswordService};
pub use cache::{Cache, CacheError};
pub use repository::{
    BaseRepository, PostRepository, TagAssociations, TagRepository, UniquenessChecker,
    UserRepository,
};
