use porta_core::error::{Field, ValidationErrors};
use porta_core::validation::{Credentials, SignInForm};

use crate::features::form::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignInFocus {
    #[default]
    Email,
    Password,
    Submit,
    Register,
}

impl SignInFocus {
    pub fn next(self) -> Self {
        match self {
            SignInFocus::Email => SignInFocus::Password,
            SignInFocus::Password => SignInFocus::Submit,
            SignInFocus::Submit => SignInFocus::Register,
            SignInFocus::Register => SignInFocus::Email,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SignInFocus::Email => SignInFocus::Register,
            SignInFocus::Password => SignInFocus::Email,
            SignInFocus::Submit => SignInFocus::Password,
            SignInFocus::Register => SignInFocus::Submit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignInState {
    pub email: TextField,
    pub password: TextField,
    pub focus: SignInFocus,
    pub errors: ValidationErrors,
}

impl Default for SignInState {
    fn default() -> Self {
        Self {
            email: TextField::new(),
            password: TextField::masked(),
            focus: SignInFocus::default(),
            errors: ValidationErrors::new(),
        }
    }
}

impl SignInState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> SignInForm {
        SignInForm {
            email: self.email.value().to_string(),
            password: self.password.value().to_string(),
        }
    }

    /// Validates the form. On failure the errors are kept for inline display
    /// and focus moves to the first invalid field.
    pub fn validate(&mut self) -> Option<Credentials> {
        match self.form().validate() {
            Ok(credentials) => {
                self.errors = ValidationErrors::new();
                Some(credentials)
            }
            Err(errors) => {
                if errors.get(Field::Email).is_some() {
                    self.focus = SignInFocus::Email;
                } else if errors.get(Field::Password).is_some() {
                    self.focus = SignInFocus::Password;
                }
                self.errors = errors;
                None
            }
        }
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            SignInFocus::Email => Some(&mut self.email),
            SignInFocus::Password => Some(&mut self.password),
            SignInFocus::Submit | SignInFocus::Register => None,
        }
    }

    /// Drops secrets after a failed submission so the form can be resubmitted.
    pub fn clear_password(&mut self) {
        self.password.clear();
        self.focus = SignInFocus::Password;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
