use serde::{Deserialize, Serialize};

/// One-to-one profile of a user. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}
