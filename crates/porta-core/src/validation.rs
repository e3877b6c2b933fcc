//! Declarative rule sets for the sign-in and registration forms.
//!
//! Rules run in declaration order per field and the first failure is kept,
//! so an empty field reports "required" rather than a format error.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Field, ValidationErrors};

/// Minimum password length accepted by both forms (and by the provider).
pub const MIN_PASSWORD_LEN: usize = 6;

/// WHATWG `input[type=email]` grammar: a local part, `@`, then dot-separated
/// DNS labels. A bare host such as `a@b` is accepted.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

/// Returns true if `email` is a well-formed address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validated email/password pair, ready to send to the identity service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Messages for one form's email and password rules.
struct Messages {
    email_required: &'static str,
    email_invalid: &'static str,
    password_required: &'static str,
    password_too_short: &'static str,
}

const SIGN_IN_MESSAGES: Messages = Messages {
    email_required: "Enter your email",
    email_invalid: "Invalid email",
    password_required: "Enter your password",
    password_too_short: "Invalid password",
};

const REGISTER_MESSAGES: Messages = Messages {
    email_required: "Enter your email",
    email_invalid: "Enter a valid email",
    password_required: "Enter a password",
    password_too_short: "Password must be at least 6 characters",
};

fn check_email(errors: &mut ValidationErrors, email: &str, messages: &Messages) {
    if email.is_empty() {
        errors.add(Field::Email, messages.email_required);
    } else if !is_valid_email(email) {
        errors.add(Field::Email, messages.email_invalid);
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str, messages: &Messages) {
    if password.is_empty() {
        errors.add(Field::Password, messages.password_required);
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(Field::Password, messages.password_too_short);
    }
}

/// Raw sign-in form input.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Checks every rule and returns the credentials to submit.
    pub fn validate(&self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email, &SIGN_IN_MESSAGES);
        check_password(&mut errors, &self.password, &SIGN_IN_MESSAGES);
        errors.into_result()?;

        Ok(Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

/// Raw registration form input.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterForm {
    /// Checks every rule, including that the confirmation matches.
    pub fn validate(&self) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email, &REGISTER_MESSAGES);
        check_password(&mut errors, &self.password, &REGISTER_MESSAGES);
        if self.password_confirm.is_empty() {
            errors.add(Field::PasswordConfirm, "Confirm your password");
        } else if self.password_confirm != self.password {
            errors.add(Field::PasswordConfirm, "Passwords must match");
        }
        errors.into_result()?;

        Ok(Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}
