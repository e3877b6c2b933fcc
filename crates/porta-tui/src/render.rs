//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never mutate
//! state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::TaskKind;
use crate::features::{home, register, sign_in};
use crate::navigator::Screen;
use crate::overlays::render_progress;
use crate::overlays::render_utils::{InputHint, render_hints};
use crate::state::{AppState, TuiState};

/// Height of the header and the footer.
const BAR_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(BAR_HEIGHT),
        ])
        .split(area);

    render_header(frame, chunks[0], state);

    let body = chunks[1];
    match state.navigator.current() {
        Screen::SignIn => sign_in::render_sign_in(frame, body, &state.sign_in),
        Screen::Register => register::render_register(frame, body, &state.register),
        Screen::Home => home::render_home(frame, body, &state.home),
    }

    render_footer(frame, chunks[2], state);

    if let Some(label) = progress_label(state) {
        render_progress(frame, body, label, state.spinner_frame);
    }
    if let Some(overlay) = &app.overlay {
        overlay.render(frame, body);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &TuiState) {
    let line = Line::from(vec![
        Span::styled(
            " Porta",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" · ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            state.navigator.current().title(),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("  ({})", state.backend),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &TuiState) {
    let hints = match state.navigator.current() {
        Screen::SignIn => vec![
            InputHint::new("Tab", "next"),
            InputHint::new("Enter", "submit"),
            InputHint::new("Esc", "quit"),
        ],
        Screen::Register => vec![
            InputHint::new("Tab", "next"),
            InputHint::new("Enter", "submit"),
            InputHint::new("Esc", "back"),
        ],
        Screen::Home => vec![
            InputHint::new("Enter", "log out"),
            InputHint::new("Ctrl+C", "quit"),
        ],
    };
    render_hints(frame, area, &hints, Color::Yellow);
}

fn progress_label(state: &TuiState) -> Option<&'static str> {
    [
        (TaskKind::SignIn, "Signing in…"),
        (TaskKind::Register, "Creating account…"),
        (TaskKind::SignOut, "Signing out…"),
    ]
    .into_iter()
    .find(|(kind, _)| state.tasks.state(*kind).is_running())
    .map(|(_, label)| label)
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::overlays::{NoticeState, Overlay};

    fn draw(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_sign_in_screen_masks_password() {
        let mut app = AppState::new("memory");
        app.tui.sign_in.email.set_value("a@b.com");
        app.tui.sign_in.password.set_value("secret1");

        let screen = draw(&app);
        assert!(screen.contains("a@b.com"));
        assert!(!screen.contains("secret1"));
        assert!(screen.contains("•••••••"));
        assert!(screen.contains("(memory)"));
    }

    #[test]
    fn test_progress_and_notice_render() {
        let mut app = AppState::new("memory");
        let task = app.tui.start_task(TaskKind::SignIn);
        assert!(draw(&app).contains("Signing in…"));

        assert!(app.tui.tasks.sign_in.finish_if_active(task));
        app.overlay = Some(Overlay::Notice(NoticeState::error("Oops", "Try again")));
        let screen = draw(&app);
        assert!(screen.contains("Oops"));
        assert!(screen.contains("Try again"));
    }
}
