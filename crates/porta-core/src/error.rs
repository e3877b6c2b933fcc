//! Error kinds surfaced by the credential flows.
//!
//! Only two kinds reach the UI:
//! - [`ValidationErrors`]: caught before submission, shown inline per field.
//! - [`ServiceError`]: any rejection from the identity service, shown as a
//!   generic notice while the detail goes to the log.

use std::fmt;

use thiserror::Error;

/// Form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    PasswordConfirm,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Password => "Password",
            Field::PasswordConfirm => "Confirm password",
        }
    }
}

/// A single failed rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// All rule failures for one form submission (at most one per field).
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure unless the field already has one; the first failing
    /// rule wins.
    pub fn add(&mut self, field: Field, message: &'static str) {
        if self.get(field).is_none() {
            self.errors.push(FieldError { field, message });
        }
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Converts into `Err(self)` when any rule failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field.label(), e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Rejection from the identity service or its plumbing.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The provider refused the request (e.g. `EMAIL_EXISTS`, `INVALID_PASSWORD`).
    #[error("identity provider rejected the request: {code}")]
    Rejected { code: String, detail: Option<String> },

    #[error("request to identity provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from identity provider: {0}")]
    InvalidResponse(String),

    #[error("session storage failed: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("no user is signed in")]
    NotSignedIn,
}

impl ServiceError {
    pub fn rejected(code: impl Into<String>) -> Self {
        ServiceError::Rejected {
            code: code.into(),
            detail: None,
        }
    }

    /// Provider error code, if the provider answered with one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ServiceError::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Outcome error of a credential submission flow.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid form: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add(Field::Email, "Enter your email");
        errors.add(Field::Email, "Enter a valid email");
        errors.add(Field::Password, "Enter a password");

        assert_eq!(errors.get(Field::Email), Some("Enter your email"));
        assert_eq!(errors.get(Field::Password), Some("Enter a password"));
        assert_eq!(errors.get(Field::PasswordConfirm), None);
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add(Field::PasswordConfirm, "Passwords must match");
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Confirm password: Passwords must match");
    }

    #[test]
    fn test_service_error_code() {
        assert_eq!(
            ServiceError::rejected("EMAIL_EXISTS").code(),
            Some("EMAIL_EXISTS")
        );
        assert_eq!(ServiceError::NotSignedIn.code(), None);
    }
}
