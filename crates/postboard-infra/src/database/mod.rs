//! Database access: connection pool, entities and repositories.

mod associations;
mod base;
mod connections;
pub mod entity;
mod repositories;
mod uniqueness;

pub use associations::OrmTagAssociations;
pub use base::{Labeled, OrmBaseRepository};
pub use connections::{DatabaseConfig, DatabasePool};
pub use repositories::{OrmPostRepository, OrmTagRepository, OrmUserRepository};
pub use uniqueness::OrmUniquenessChecker;

#[cfg(test)]
mod tests;
