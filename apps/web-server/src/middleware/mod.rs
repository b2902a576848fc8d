//! Middleware modules.

pub mod error;
pub mod method_override;
