//! Data Transfer Objects - view models and session payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A user in a select list; `checked` marks the current owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOption {
    pub id: i32,
    pub username: String,
    pub checked: bool,
}

/// A tag in a checkbox list; `checked` marks tags already on the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOption {
    pub id: i32,
    pub title: String,
    pub checked: bool,
}

/// Validation message for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

/// One-time status message, e.g. `{type: "primary", message: "Post updated."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashNotice {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl FlashNotice {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Data that survives exactly one redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default)]
    pub errors: Vec<FieldMessage>,
    /// Previously submitted form values, for re-populating inputs.
    #[serde(default)]
    pub old: BTreeMap<String, String>,
    #[serde(default)]
    pub notice: Option<FlashNotice>,
}

impl Flash {
    pub fn with_notice(notice: FlashNotice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.old.is_empty() && self.notice.is_none()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Prev/next links for a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    /// Links under `base` (e.g. `/posts`) for `page` of `last_page`.
    pub fn new(base: &str, page: u64, last_page: u64) -> Self {
        let link = |n: u64| format!("{base}?page={n}");
        Self {
            previous: (page > 1).then(|| link(page - 1)),
            next: (page < last_page).then(|| link(page + 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_json_uses_type_key() {
        let flash = Flash::with_notice(FlashNotice::new("primary", "Post updated."));
        let json = flash.to_json().unwrap();
        assert!(json.contains(r#""type":"primary""#));
        assert_eq!(Flash::from_json(&json).unwrap(), flash);
    }

    #[test]
    fn test_flash_tolerates_missing_sections() {
        let flash = Flash::from_json("{}").unwrap();
        assert!(flash.is_empty());
    }

    #[test]
    fn test_page_links() {
        assert_eq!(
            PageLinks::new("/posts", 1, 2),
            PageLinks {
                previous: None,
                next: Some("/posts?page=2".to_string()),
            }
        );
        assert_eq!(PageLinks::new("/posts", 2, 2).previous.as_deref(), Some("/posts?page=1"));
        assert_eq!(PageLinks::new("/posts", 1, 1), PageLinks::default());
    }
}
