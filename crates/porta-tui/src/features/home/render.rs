use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::HomeState;
use crate::common::text::truncate_with_ellipsis;
use crate::features::form::{FORM_WIDTH, render_button, render_form_card};

pub fn render_home(frame: &mut Frame, area: Rect, state: &HomeState) {
    let inner = render_form_card(frame, area, "Home", 5);

    let width = FORM_WIDTH.saturating_sub(4) as usize;
    let lines = match state.observer.identity() {
        Some(identity) => vec![
            Line::from(Span::styled("Signed in as", Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                truncate_with_ellipsis(&identity.email, width),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
        ],
        None => vec![
            Line::from(Span::styled(
                "No user signed in",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ],
    };
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y, inner.width, 2.min(inner.height)),
    );

    let button_x = inner.width.saturating_sub(12) / 2;
    render_button(
        frame,
        Rect::new(inner.x + button_x, inner.y, inner.width - button_x, inner.height),
        3,
        "Log out",
        true,
    );
}
