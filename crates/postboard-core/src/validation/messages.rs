//! Human-readable messages keyed by `<field>.<rule>`.

const MESSAGES: &[(&str, &str)] = &[
    ("username.required", "Username can't be blank"),
    ("username.unique", "Username is already taken"),
    ("username.max", "Username is too long (maximum is 66 characters)"),
    (
        "username.regex",
        "Username must be letters or numbers or chinese characters or underline (underline can't start and end)",
    ),
    ("email.required", "Email can't be blank"),
    ("email.email", "Email is invalid"),
    ("email.unique", "Email is already taken"),
    ("password.required", "Password can't be blank"),
    ("password.min", "password is too short (minimum is 6 characters)"),
    ("password.max", "password is too long (maximum is 30 characters)"),
    ("title.required", "Title can't be blank"),
    ("content.required", "Content can't be blank"),
];

/// Look up the message registered for `key`.
pub fn lookup(key: &str) -> Option<&'static str> {
    MESSAGES
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, message)| *message)
}

/// Message for a failed rule, with a generic fallback for unregistered keys.
pub fn message_for(field: &str, rule: &str) -> String {
    lookup(&format!("{field}.{rule}"))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{rule} validation failed on {field}"))
}
