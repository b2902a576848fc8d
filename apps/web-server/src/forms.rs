//! URL-encoded form input.
//!
//! Bodies are decoded into raw pairs so repeated keys survive: tag ids arrive
//! as `tags=1&tags=2` or `tags[]=1&tags[]=2`.

use std::collections::BTreeMap;

use postboard_core::domain::TagSet;
use postboard_core::validation::{PostForm, RegisterUser};

use crate::middleware::error::{AppError, AppResult};

/// Decoded form body.
#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// First value of `key`, as submitted. Blank values count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    /// Like [`FormFields::text`], with surrounding whitespace removed.
    pub fn trimmed(&self, key: &str) -> Option<String> {
        self.text(key).map(|v| v.trim().to_string())
    }

    /// Every non-blank value submitted under `key` or `key[]`.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key || k.strip_suffix("[]") == Some(key))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Submitted tag ids. Absent tags are the empty set.
    pub fn tag_set(&self) -> AppResult<TagSet> {
        self.values("tags")
            .map(|raw| {
                raw.parse::<i32>()
                    .map_err(|_| AppError::BadRequest(format!("invalid tag id: {raw}")))
            })
            .collect()
    }

    /// Owner id. Missing or malformed ids name no user.
    pub fn user_id(&self) -> AppResult<i32> {
        let raw = self.trimmed("user_id");
        raw.as_deref()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "user with id {} not found",
                    raw.as_deref().unwrap_or("(none)")
                ))
            })
    }

    /// Input to re-populate a form after a failed submission.
    /// Fields named in `except` are never echoed back.
    pub fn old_input(&self, except: &[&str]) -> BTreeMap<String, String> {
        let mut old = BTreeMap::new();
        for (key, value) in &self.0 {
            if except.contains(&key.as_str()) || key.starts_with('_') {
                continue;
            }
            old.entry(key.trim_end_matches("[]").to_string())
                .and_modify(|joined: &mut String| {
                    joined.push(',');
                    joined.push_str(value);
                })
                .or_insert_with(|| value.clone());
        }
        old
    }

    pub fn post_form(&self) -> PostForm {
        PostForm {
            title: self.text("title"),
            content: self.text("content"),
        }
    }

    /// Registration input. The password is taken verbatim apart from blank checks.
    pub fn register_user(&self) -> RegisterUser {
        RegisterUser {
            username: self.trimmed("username"),
            email: self.trimmed("email"),
            password: self.text("password"),
        }
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_blank_text_is_absent() {
        let form = fields(&[("title", "   "), ("content", "    fn main() {}\n")]);
        assert_eq!(form.text("title"), None);
        assert_eq!(form.text("content").as_deref(), Some("    fn main() {}\n"));
        assert_eq!(form.trimmed("content").as_deref(), Some("fn main() {}"));
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn test_registration_trims_identifiers_but_not_password() {
        let form = fields(&[
            ("username", " bob_1 "),
            ("email", "bob@example.com\n"),
            ("password", " secret1 "),
        ]);
        let input = form.register_user();
        assert_eq!(input.username.as_deref(), Some("bob_1"));
        assert_eq!(input.email.as_deref(), Some("bob@example.com"));
        assert_eq!(input.password.as_deref(), Some(" secret1 "));
    }

    #[test]
    fn test_tags_accept_both_key_styles() {
        let form = fields(&[("tags", "3"), ("tags[]", "1"), ("tags", "3"), ("tags", "")]);
        assert_eq!(form.tag_set().unwrap().to_vec(), vec![1, 3]);

        assert!(fields(&[]).tag_set().unwrap().is_empty());
        assert!(matches!(
            fields(&[("tags", "x")]).tag_set(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_user_id_missing_or_malformed_is_not_found() {
        assert_eq!(fields(&[("user_id", " 4 ")]).user_id().unwrap(), 4);
        assert!(matches!(fields(&[]).user_id(), Err(AppError::NotFound(_))));
        assert!(matches!(
            fields(&[("user_id", "abc")]).user_id(),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_old_input_skips_secrets() {
        let form = fields(&[
            ("username", "bob"),
            ("password", "hunter22"),
            ("_token", "x"),
            ("tags[]", "1"),
            ("tags[]", "2"),
        ]);
        let old = form.old_input(&["password"]);
        assert_eq!(old.get("username").map(String::as_str), Some("bob"));
        assert_eq!(old.get("tags").map(String::as_str), Some("1,2"));
        assert!(!old.contains_key("password"));
        assert!(!old.contains_key("_token"));
    }
}
