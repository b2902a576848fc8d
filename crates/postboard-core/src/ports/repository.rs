use async_trait::async_trait;

use crate::domain::{NewPost, NewUser, Page, Post, PostChanges, PostSummary, Tag, TagSet, User};
use crate::error::RepoError;

/// Generic repository trait defining standard lookups.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Fetch every row of the table, in primary key order.
    async fn all(&self) -> Result<Vec<T>, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    /// Find a user, failing with `RepoError::NotFound` when absent.
    async fn find_or_fail(&self, id: i32) -> Result<User, RepoError> {
        self.find_by_id(id)
            .await?
            .ok_or(RepoError::not_found("user", id))
    }
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Create a post owned by `user_id`.
    async fn create(&self, user_id: i32, post: NewPost) -> Result<Post, RepoError>;

    /// Merge the present fields of `changes` into the stored post.
    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError>;

    /// Reassign the owning user.
    async fn associate_user(&self, id: i32, user_id: i32) -> Result<Post, RepoError>;

    /// Posts ordered by `updated_at` descending, authors and profiles eager loaded.
    async fn paginate(&self, page: u64, per_page: u64) -> Result<Page<PostSummary>, RepoError>;

    /// Detach all tags and remove the post in one transaction.
    /// Returns `false` when the post does not exist.
    async fn destroy(&self, id: i32) -> Result<bool, RepoError>;

    async fn find_or_fail(&self, id: i32) -> Result<Post, RepoError> {
        self.find_by_id(id)
            .await?
            .ok_or(RepoError::not_found("post", id))
    }
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i32> {
    async fn create(&self, title: &str) -> Result<Tag, RepoError>;

    /// Tags attached to a post, ordered by id.
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Tag>, RepoError>;
}

/// Many-to-many association between posts and tags.
#[async_trait]
pub trait TagAssociations: Send + Sync {
    /// Add associations; already attached ids are skipped.
    /// Unknown tag ids fail with `RepoError::NotFound` before anything is written.
    async fn attach(&self, post_id: i32, tags: &TagSet) -> Result<(), RepoError>;

    /// Fail with `RepoError::NotFound` naming the smallest unknown tag id.
    async fn ensure_tags(&self, tags: &TagSet) -> Result<(), RepoError>;

    /// Replace the tag set of a post with exactly `tags`.
    async fn sync(&self, post_id: i32, tags: &TagSet) -> Result<(), RepoError>;

    /// Remove every association of a post. Returns the number of rows removed.
    async fn detach_all(&self, post_id: i32) -> Result<u64, RepoError>;

    /// Current tag ids of a post.
    async fn tag_ids(&self, post_id: i32) -> Result<TagSet, RepoError>;
}

/// Existence check behind `unique:<table>` validation rules.
#[async_trait]
pub trait UniquenessChecker: Send + Sync {
    async fn is_taken(&self, table: &str, column: &str, value: &str) -> Result<bool, RepoError>;
}
