//! Blocking indicator shown while a submission is in flight.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::render_utils::{calculate_overlay_area, render_overlay_container};

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

pub fn render_progress(frame: &mut Frame, area: Rect, label: &str, spinner_frame: usize) {
    let popup = calculate_overlay_area(area, 32, 3);
    let inner = render_overlay_container(frame, popup, "Please wait", Color::Cyan);

    let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::styled(label, Style::default().fg(Color::White)),
        ]))
        .alignment(Alignment::Center),
        inner,
    );
}
