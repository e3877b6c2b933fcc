use porta_core::error::Field;
use ratatui::Frame;
use ratatui::layout::Rect;

use super::state::{SignInFocus, SignInState};
use crate::features::form::{FIELD_HEIGHT, render_button, render_field, render_form_card};

pub fn render_sign_in(frame: &mut Frame, area: Rect, state: &SignInState) {
    let inner = render_form_card(frame, area, "Sign in", FIELD_HEIGHT * 2 + 3);

    render_field(
        frame,
        inner,
        0,
        "Email",
        &state.email,
        state.focus == SignInFocus::Email,
        state.errors.get(Field::Email),
    );
    render_field(
        frame,
        inner,
        FIELD_HEIGHT,
        "Password",
        &state.password,
        state.focus == SignInFocus::Password,
        state.errors.get(Field::Password),
    );
    render_button(
        frame,
        inner,
        FIELD_HEIGHT * 2,
        "Sign in",
        state.focus == SignInFocus::Submit,
    );
    render_button(
        frame,
        inner,
        FIELD_HEIGHT * 2 + 2,
        "No account? Create one",
        state.focus == SignInFocus::Register,
    );
}
