//! Sign-in screen reducer.

use crossterm::event::{KeyCode, KeyEvent};
use porta_core::error::ServiceError;
use porta_core::flows::SIGN_IN_FAILED;
use porta_core::identity::User;

use super::state::{SignInFocus, SignInState};
use crate::features::form::FormAction;
use crate::mutations::StateMutation;
use crate::navigator::Trigger;
use crate::overlays::NoticeState;

pub fn handle_key(state: &mut SignInState, key: KeyEvent) -> FormAction {
    match key.code {
        KeyCode::Esc => FormAction::Quit,
        KeyCode::Tab | KeyCode::Down => {
            state.focus = state.focus.next();
            FormAction::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.focus = state.focus.prev();
            FormAction::None
        }
        KeyCode::Enter => match state.focus {
            SignInFocus::Email => {
                state.focus = SignInFocus::Password;
                FormAction::None
            }
            SignInFocus::Password | SignInFocus::Submit => submit(state),
            SignInFocus::Register => FormAction::Navigate(Trigger::OpenRegister),
        },
        _ => {
            if let Some(field) = state.focused_field_mut() {
                field.handle_key(key);
            }
            FormAction::None
        }
    }
}

pub fn handle_paste(state: &mut SignInState, text: &str) {
    if let Some(field) = state.focused_field_mut() {
        field.insert_str(text);
    }
}

fn submit(state: &mut SignInState) -> FormAction {
    match state.validate() {
        Some(credentials) => FormAction::Submit(credentials),
        None => FormAction::None,
    }
}

/// Handles the outcome of a sign-in task.
pub fn handle_result(
    state: &mut SignInState,
    result: Result<User, ServiceError>,
) -> Vec<StateMutation> {
    match result {
        Ok(_) => {
            state.reset();
            vec![StateMutation::Navigate(Trigger::SignedIn)]
        }
        Err(_) => {
            state.clear_password();
            vec![StateMutation::ShowNotice(NoticeState::error(
                "Sign in failed",
                SIGN_IN_FAILED,
            ))]
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use porta_core::error::Field;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut SignInState, text: &str) {
        for c in text.chars() {
            handle_key(state, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_enter_moves_from_email_to_password() {
        let mut state = SignInState::new();
        type_text(&mut state, "a@b.com");
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), FormAction::None);
        assert_eq!(state.focus, SignInFocus::Password);
    }

    #[test]
    fn test_invalid_submit_shows_inline_errors() {
        let mut state = SignInState::new();
        type_text(&mut state, "bad-email");
        handle_key(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "123");

        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), FormAction::None);
        assert_eq!(state.errors.get(Field::Email), Some("Invalid email"));
        assert_eq!(state.errors.get(Field::Password), Some("Invalid password"));
        assert_eq!(state.focus, SignInFocus::Email);
    }

    #[test]
    fn test_valid_submit_returns_credentials() {
        let mut state = SignInState::new();
        type_text(&mut state, "a@b.com");
        handle_key(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "secret1");

        match handle_key(&mut state, key(KeyCode::Enter)) {
            FormAction::Submit(credentials) => {
                assert_eq!(credentials.email, "a@b.com");
                assert_eq!(credentials.password, "secret1");
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert!(state.errors.is_empty());
    }

    #[test]
    fn test_register_link_and_escape() {
        let mut state = SignInState::new();
        state.focus = SignInFocus::Register;
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Enter)),
            FormAction::Navigate(Trigger::OpenRegister)
        );
        assert_eq!(handle_key(&mut state, key(KeyCode::Esc)), FormAction::Quit);
    }

    #[test]
    fn test_failure_keeps_email_and_clears_password() {
        let mut state = SignInState::new();
        state.email.set_value("a@b.com");
        state.password.set_value("wrong12");

        let mutations = handle_result(&mut state, Err(ServiceError::rejected("INVALID_PASSWORD")));
        assert_eq!(mutations.len(), 1);
        assert!(matches!(mutations[0], StateMutation::ShowNotice(_)));
        assert_eq!(state.email.value(), "a@b.com");
        assert!(state.password.is_empty());
    }
}
