//! # Postboard Core
//!
//! The domain layer of Postboard.
//! Entities, ports, validation rule sets and the tag-set algebra live here;
//! nothing in this crate performs I/O.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::{DomainError, RepoError};
