//! Notice overlay: a blocking message dismissed with Enter or Esc.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::OverlayTransition;
use super::render_utils::{
    InputHint, calculate_overlay_area, render_hints, render_overlay_container,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTone {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeState {
    pub title: String,
    pub message: String,
    pub tone: NoticeTone,
}

impl NoticeState {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            tone: NoticeTone::Info,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            tone: NoticeTone::Error,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayTransition {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => OverlayTransition::Close,
            _ => OverlayTransition::Stay,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = match self.tone {
            NoticeTone::Info => Color::Green,
            NoticeTone::Error => Color::Red,
        };
        let popup = calculate_overlay_area(area, 48, 7);
        let inner = render_overlay_container(frame, popup, &self.title, color);

        let body = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(1),
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                self.message.as_str(),
                Style::default().fg(Color::White),
            )))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
            body,
        );

        render_hints(frame, inner, &[InputHint::new("Enter", "dismiss")], color);
    }
}
