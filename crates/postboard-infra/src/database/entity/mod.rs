//! SeaORM entities for the relational schema.

pub mod post;
pub mod post_tag;
pub mod profile;
pub mod tag;
pub mod user;

pub mod prelude {
    pub use super::post::Entity as PostEntity;
    pub use super::post_tag::Entity as PostTagEntity;
    pub use super::profile::Entity as ProfileEntity;
    pub use super::tag::Entity as TagEntity;
    pub use super::user::Entity as UserEntity;
}
