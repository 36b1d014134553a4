//! Request and response bodies of the user endpoints.

use serde::{Deserialize, Serialize};

pub const FULL_NAME_MIN: usize = 2;
pub const FULL_NAME_MAX: usize = 100;

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub full_name: String,
    pub is_admin: bool,
}

/// One entry of a 422 response's `detail` list.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "value is not a valid email address"));
        }

        let len = self.full_name.chars().count();
        if !(FULL_NAME_MIN..=FULL_NAME_MAX).contains(&len) {
            errors.push(FieldError::new(
                "full_name",
                format!("length must be between {FULL_NAME_MIN} and {FULL_NAME_MAX} characters"),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// `local@domain.tld` with no whitespace and non-empty dot-separated labels.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, full_name: &str) -> UserCreate {
        UserCreate { email: email.to_owned(), full_name: full_name.to_owned(), is_admin: false }
    }

    #[test]
    fn accepts_plain_user() {
        assert!(user("user@example.com", "Jane Doe").validate().is_ok());
    }

    #[test]
    fn reports_every_invalid_field() {
        let errors = user("not-an-email", "x").validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["email", "full_name"]);
    }

    #[test]
    fn email_shapes() {
        for bad in ["@example.com", "a@b", "a@.com", "a b@example.com", "a@b@c.com"] {
            assert!(!is_valid_email(bad), "{bad}");
        }
        assert!(is_valid_email("first.last+tag@sub.example.org"));
    }
}
