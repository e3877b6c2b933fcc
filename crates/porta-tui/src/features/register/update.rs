//! Registration screen reducer.

use crossterm::event::{KeyCode, KeyEvent};
use porta_core::error::ServiceError;
use porta_core::flows::{REGISTRATION_FAILED, REGISTRATION_SUCCEEDED};
use porta_core::identity::User;

use super::state::{RegisterFocus, RegisterState};
use crate::features::form::FormAction;
use crate::mutations::StateMutation;
use crate::navigator::Trigger;
use crate::overlays::NoticeState;

pub fn handle_key(state: &mut RegisterState, key: KeyEvent) -> FormAction {
    match key.code {
        KeyCode::Esc => FormAction::Navigate(Trigger::Back),
        KeyCode::Tab | KeyCode::Down => {
            state.focus = state.focus.next();
            FormAction::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.focus = state.focus.prev();
            FormAction::None
        }
        KeyCode::Enter => match state.focus {
            RegisterFocus::Email | RegisterFocus::Password => {
                state.focus = state.focus.next();
                FormAction::None
            }
            RegisterFocus::PasswordConfirm | RegisterFocus::Submit => {
                match state.validate() {
                    Some(credentials) => FormAction::Submit(credentials),
                    None => FormAction::None,
                }
            }
            RegisterFocus::Back => FormAction::Navigate(Trigger::Back),
        },
        _ => {
            if let Some(field) = state.focused_field_mut() {
                field.handle_key(key);
            }
            FormAction::None
        }
    }
}

pub fn handle_paste(state: &mut RegisterState, text: &str) {
    if let Some(field) = state.focused_field_mut() {
        field.insert_str(text);
    }
}

/// Handles the outcome of the registration pipeline.
pub fn handle_result(
    state: &mut RegisterState,
    result: Result<User, ServiceError>,
) -> Vec<StateMutation> {
    match result {
        Ok(_) => {
            state.reset();
            vec![
                StateMutation::ShowNotice(NoticeState::info("Welcome", REGISTRATION_SUCCEEDED)),
                StateMutation::Navigate(Trigger::Registered),
            ]
        }
        Err(_) => {
            state.clear_passwords();
            vec![StateMutation::ShowNotice(NoticeState::error(
                "Registration failed",
                REGISTRATION_FAILED,
            ))]
        }
    }
}
