use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Profile;

/// User entity - represents a registered author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Public projection of a user (id + username) with its profile.
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub id: i32,
    pub username: String,
    pub profile: Option<Profile>,
}
