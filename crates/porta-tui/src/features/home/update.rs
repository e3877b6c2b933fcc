use crossterm::event::{KeyCode, KeyEvent};
use porta_core::error::ServiceError;
use porta_core::flows::{SIGN_OUT_FAILED, SIGN_OUT_SUCCEEDED};

use crate::mutations::StateMutation;
use crate::navigator::Trigger;
use crate::overlays::NoticeState;

#[derive(Debug, PartialEq, Eq)]
pub enum HomeAction {
    None,
    LogOut,
}

pub fn handle_key(key: KeyEvent) -> HomeAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('l' | 'L') => HomeAction::LogOut,
        _ => HomeAction::None,
    }
}

/// Handles the outcome of a sign-out task.
///
/// Failure leaves the user on Home; the error detail is already logged by the
/// flow.
pub fn handle_sign_out_result(result: Result<(), ServiceError>) -> Vec<StateMutation> {
    match result {
        Ok(()) => vec![
            StateMutation::ClearIdentity,
            StateMutation::ShowNotice(NoticeState::info("Signed out", SIGN_OUT_SUCCEEDED)),
            StateMutation::Navigate(Trigger::SignedOut),
        ],
        Err(_) => vec![StateMutation::ShowNotice(NoticeState::error(
            "Sign-out failed",
            SIGN_OUT_FAILED,
        ))],
    }
}
