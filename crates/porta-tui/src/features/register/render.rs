use porta_core::error::Field;
use ratatui::Frame;
use ratatui::layout::Rect;

use super::state::{RegisterFocus, RegisterState};
use crate::features::form::{FIELD_HEIGHT, render_button, render_field, render_form_card};

pub fn render_register(frame: &mut Frame, area: Rect, state: &RegisterState) {
    let inner = render_form_card(frame, area, "Create account", FIELD_HEIGHT * 3 + 3);

    let fields = [
        ("Email", &state.email, RegisterFocus::Email, Field::Email),
        (
            "Password",
            &state.password,
            RegisterFocus::Password,
            Field::Password,
        ),
        (
            "Confirm password",
            &state.password_confirm,
            RegisterFocus::PasswordConfirm,
            Field::PasswordConfirm,
        ),
    ];
    for (row, (label, field, focus, error_field)) in (0u16..).zip(fields) {
        render_field(
            frame,
            inner,
            row * FIELD_HEIGHT,
            label,
            field,
            state.focus == focus,
            state.errors.get(error_field),
        );
    }

    render_button(
        frame,
        inner,
        FIELD_HEIGHT * 3,
        "Register",
        state.focus == RegisterFocus::Submit,
    );
    render_button(
        frame,
        inner,
        FIELD_HEIGHT * 3 + 2,
        "Back to sign in",
        state.focus == RegisterFocus::Back,
    );
}
