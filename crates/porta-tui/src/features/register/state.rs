use porta_core::error::{Field, ValidationErrors};
use porta_core::validation::{Credentials, RegisterForm};

use crate::features::form::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterFocus {
    #[default]
    Email,
    Password,
    PasswordConfirm,
    Submit,
    Back,
}

impl RegisterFocus {
    const ORDER: [RegisterFocus; 5] = [
        RegisterFocus::Email,
        RegisterFocus::Password,
        RegisterFocus::PasswordConfirm,
        RegisterFocus::Submit,
        RegisterFocus::Back,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|&f| f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone)]
pub struct RegisterState {
    pub email: TextField,
    pub password: TextField,
    pub password_confirm: TextField,
    pub focus: RegisterFocus,
    pub errors: ValidationErrors,
}

impl Default for RegisterState {
    fn default() -> Self {
        Self {
            email: TextField::new(),
            password: TextField::masked(),
            password_confirm: TextField::masked(),
            focus: RegisterFocus::default(),
            errors: ValidationErrors::new(),
        }
    }
}

impl RegisterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> RegisterForm {
        RegisterForm {
            email: self.email.value().to_string(),
            password: self.password.value().to_string(),
            password_confirm: self.password_confirm.value().to_string(),
        }
    }

    /// Validates the form, keeping errors for inline display.
    pub fn validate(&mut self) -> Option<Credentials> {
        match self.form().validate() {
            Ok(credentials) => {
                self.errors = ValidationErrors::new();
                Some(credentials)
            }
            Err(errors) => {
                self.focus = if errors.get(Field::Email).is_some() {
                    RegisterFocus::Email
                } else if errors.get(Field::Password).is_some() {
                    RegisterFocus::Password
                } else {
                    RegisterFocus::PasswordConfirm
                };
                self.errors = errors;
                None
            }
        }
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            RegisterFocus::Email => Some(&mut self.email),
            RegisterFocus::Password => Some(&mut self.password),
            RegisterFocus::PasswordConfirm => Some(&mut self.password_confirm),
            RegisterFocus::Submit | RegisterFocus::Back => None,
        }
    }

    pub fn clear_passwords(&mut self) {
        self.password.clear();
        self.password_confirm.clear();
        self.focus = RegisterFocus::Password;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
