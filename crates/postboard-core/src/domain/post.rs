use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Author;

/// Post entity - a blog post owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a post; the id and timestamps come from storage.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// Partial update of a post. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// A post as listed on the index page, with its author eagerly loaded.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    #[serde(flatten)]
    pub post: Post,
    pub user: Option<Author>,
}
