//! Declarative input validation.
//!
//! Each input record declares its field rules twice: the synchronous rules
//! through the `validator` derive (each failure tagged with a rule code), and
//! the evaluation order through [`RuleSet::RULES`]. [`validate_all`] walks the
//! ordered rules, runs `unique` lookups against storage, and reports at most
//! one failure per field: the first rule that fails.

mod messages;
mod rules;

use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::error::DomainError;
use crate::ports::UniquenessChecker;

pub use messages::{lookup, message_for};
pub use rules::{PostForm, RegisterUser, is_valid_username};

/// Kind of a field rule. Its name is the second half of a message key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Required,
    Unique,
    Email,
    Regex,
    Min,
    Max,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Unique => "unique",
            RuleKind::Email => "email",
            RuleKind::Regex => "regex",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
        }
    }
}

/// A record whose fields are checked by [`validate_all`].
pub trait RuleSet: Validate + Sync {
    /// Table that `unique` rules look values up in; the column is the field name.
    const TABLE: &'static str;

    /// Fields with their rules, in evaluation order.
    const RULES: &'static [(&'static str, &'static [RuleKind])];

    /// Submitted value of a field.
    fn value(&self, field: &str) -> Option<&str>;
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: RuleKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, rule: RuleKind) -> Self {
        Self {
            field,
            rule,
            message: message_for(field, rule.as_str()),
        }
    }

    /// The `<field>.<rule>` key of this failure.
    pub fn key(&self) -> String {
        format!("{}.{}", self.field, self.rule.as_str())
    }
}

/// Every failed field of one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure(Vec<FieldError>);

impl ValidationFailure {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }

    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Run every rule of `input`. `unique` rules are skipped for empty values.
pub async fn validate_all<T: RuleSet>(
    input: &T,
    uniqueness: &dyn UniquenessChecker,
) -> Result<(), DomainError> {
    let sync_errors = input.validate().err().unwrap_or_else(ValidationErrors::new);
    let field_errors = sync_errors.field_errors();

    let mut failures = Vec::new();
    for &(field, rules) in T::RULES {
        for rule in rules.iter().copied() {
            let failed = match rule {
                RuleKind::Unique => match input.value(field) {
                    Some(value) if !value.is_empty() => {
                        uniqueness.is_taken(T::TABLE, field, value).await?
                    }
                    _ => false,
                },
                kind => field_errors
                    .get(field)
                    .is_some_and(|errors| errors.iter().any(|e| e.code == kind.as_str())),
            };

            if failed {
                failures.push(FieldError::new(field, rule));
                break;
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(ValidationFailure(failures)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepoError;
    use async_trait::async_trait;

    struct Taken(&'static [(&'static str, &'static str)]);

    #[async_trait]
    impl UniquenessChecker for Taken {
        async fn is_taken(
            &self,
            _table: &str,
            column: &str,
            value: &str,
        ) -> Result<bool, RepoError> {
            Ok(self.0.iter().any(|(c, v)| *c == column && *v == value))
        }
    }

    fn registration(username: &str, email: &str, password: &str) -> RegisterUser {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RegisterUser {
            username: opt(username),
            email: opt(email),
            password: opt(password),
        }
    }

    async fn failures(input: &RegisterUser, taken: &Taken) -> Vec<String> {
        match validate_all(input, taken).await {
            Ok(()) => Vec::new(),
            Err(DomainError::Validation(failure)) => {
                failure.errors().iter().map(FieldError::key).collect()
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_username_pattern() {
        assert!(!is_valid_username("_bob"));
        assert!(!is_valid_username("bob_"));
        assert!(!is_valid_username("bob smith"));
        assert!(!is_valid_username(""));
        assert!(is_valid_username("bob_1"));
        assert!(is_valid_username("李雷"));
        assert!(!is_valid_username("_"));
    }

    #[tokio::test]
    async fn test_valid_registration_passes() {
        let input = registration("bob_1", "bob@example.com", "secret1");
        assert!(failures(&input, &Taken(&[])).await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_fields_report_required_only() {
        let input = registration("", "", "");
        assert_eq!(
            failures(&input, &Taken(&[])).await,
            vec!["username.required", "email.required", "password.required"]
        );
    }

    #[tokio::test]
    async fn test_first_failing_rule_wins() {
        let long_name = "a".repeat(67);
        let input = registration(&long_name, "not-an-email", "123");
        assert_eq!(
            failures(&input, &Taken(&[])).await,
            vec!["username.max", "email.email", "password.min"]
        );
    }

    #[tokio::test]
    async fn test_unique_checked_in_declared_order() {
        let taken = Taken(&[("username", "_bob"), ("email", "bob@example.com")]);
        let input = registration("_bob", "bob@example.com", &"x".repeat(31));
        assert_eq!(
            failures(&input, &taken).await,
            vec!["username.unique", "email.unique", "password.max"]
        );
    }

    #[tokio::test]
    async fn test_regex_failure_message() {
        let input = registration("bob_", "bob@example.com", "secret1");
        let err = validate_all(&input, &Taken(&[])).await.unwrap_err();
        let DomainError::Validation(failure) = err else {
            panic!("expected validation failure");
        };
        let username = failure.for_field("username").unwrap();
        assert_eq!(username.rule, RuleKind::Regex);
        assert!(username.message.starts_with("Username must be letters"));
    }

    #[tokio::test]
    async fn test_post_form_requires_title_and_content() {
        let form = PostForm {
            title: None,
            content: Some("body".to_string()),
        };
        let err = validate_all(&form, &Taken(&[])).await.unwrap_err();
        let DomainError::Validation(failure) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(failure.errors().len(), 1);
        assert_eq!(failure.errors()[0].key(), "title.required");
        assert_eq!(failure.to_string(), "Title can't be blank");
    }
}
