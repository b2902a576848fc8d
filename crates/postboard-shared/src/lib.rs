//! # Postboard Shared
//!
//! View models handed to templates, the flash payload carried across
//! redirects, and the RFC 7807 error body.

pub mod dto;
pub mod response;

pub use dto::{FieldMessage, Flash, FlashNotice, PageLinks, TagOption, UserOption};
pub use response::ErrorResponse;
