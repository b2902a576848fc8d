//! Input records and their field rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{RuleKind, RuleSet};
use crate::domain::NewPost;

static USERNAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_\x{4e00}-\x{9fa5}]+$").expect("username pattern is valid")
});

/// Letters, digits, underscores and CJK ideographs; no leading or trailing underscore.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_CHARS.is_match(username) && !username.starts_with('_') && !username.ends_with('_')
}

fn username_pattern(username: &str) -> Result<(), ValidationError> {
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(ValidationError::new("regex"))
    }
}

fn password_length(password: &str) -> Result<(), ValidationError> {
    match password.chars().count() {
        n if n < 6 => Err(ValidationError::new("min")),
        n if n > 30 => Err(ValidationError::new("max")),
        _ => Ok(()),
    }
}

/// Registration input. Empty strings must be normalised to `None` by the caller.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(
        required(code = "required"),
        length(max = 66, code = "max"),
        custom(function = "username_pattern")
    )]
    pub username: Option<String>,

    #[validate(required(code = "required"), email(code = "email"))]
    pub email: Option<String>,

    #[validate(required(code = "required"), custom(function = "password_length"))]
    pub password: Option<String>,
}

impl RuleSet for RegisterUser {
    const TABLE: &'static str = "users";
    const RULES: &'static [(&'static str, &'static [RuleKind])] = &[
        (
            "username",
            &[
                RuleKind::Required,
                RuleKind::Unique,
                RuleKind::Max,
                RuleKind::Regex,
            ],
        ),
        (
            "email",
            &[RuleKind::Required, RuleKind::Email, RuleKind::Unique],
        ),
        (
            "password",
            &[RuleKind::Required, RuleKind::Min, RuleKind::Max],
        ),
    ];

    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "username" => self.username.as_deref(),
            "email" => self.email.as_deref(),
            "password" => self.password.as_deref(),
            _ => None,
        }
    }
}

/// Post form input, checked before a post is stored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostForm {
    #[validate(required(code = "required"))]
    pub title: Option<String>,

    #[validate(required(code = "required"))]
    pub content: Option<String>,
}

impl PostForm {
    /// The post to insert, once both fields are present.
    pub fn into_new_post(self) -> Option<NewPost> {
        Some(NewPost {
            title: self.title?,
            content: self.content?,
        })
    }
}

impl RuleSet for PostForm {
    const TABLE: &'static str = "posts";
    const RULES: &'static [(&'static str, &'static [RuleKind])] = &[
        ("title", &[RuleKind::Required]),
        ("content", &[RuleKind::Required]),
    ];

    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "title" => self.title.as_deref(),
            "content" => self.content.as_deref(),
            _ => None,
        }
    }
}
