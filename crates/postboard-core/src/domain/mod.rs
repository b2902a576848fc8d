//! Domain entities - the core business objects.

mod page;
mod post;
mod profile;
mod tag;
mod tag_set;
mod user;

pub use page::Page;
pub use post::{NewPost, Post, PostChanges, PostSummary};
pub use profile::Profile;
pub use tag::Tag;
pub use tag_set::{TagDiff, TagSet};
pub use user::{Author, NewUser, User};
