use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::TextField;
use crate::common::text::tail_to_width;

/// Width of the centered form card, borders included.
pub const FORM_WIDTH: u16 = 52;

/// Rows a field occupies: label, value, error.
pub const FIELD_HEIGHT: u16 = 3;

/// Draws the form card centered in `area` and returns its inner rect.
pub fn render_form_card(frame: &mut Frame, area: Rect, title: &str, content_height: u16) -> Rect {
    let width = FORM_WIDTH.min(area.width);
    let height = (content_height + 2).min(area.height);
    let card = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    Rect::new(
        inner.x + 1,
        inner.y,
        inner.width.saturating_sub(2),
        inner.height,
    )
}

/// Renders a labelled field at row `y` of `area`; the error (if any) goes on
/// the row below the value.
pub fn render_field(
    frame: &mut Frame,
    area: Rect,
    y: u16,
    label: &str,
    field: &TextField,
    focused: bool,
    error: Option<&str>,
) {
    if y + FIELD_HEIGHT > area.height {
        return;
    }
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(label, label_style))),
        Rect::new(area.x, area.y + y, area.width, 1),
    );

    let prompt = if focused { "> " } else { "  " };
    let display = field.display();
    let max_width = area.width.saturating_sub(3) as usize;
    let mut spans = vec![
        Span::styled(prompt, Style::default().fg(Color::DarkGray)),
        Span::styled(
            tail_to_width(&display, max_width).to_string(),
            Style::default().fg(Color::White),
        ),
    ];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect::new(area.x, area.y + y + 1, area.width, 1),
    );

    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("  {error}"),
                Style::default().fg(Color::Red),
            ))),
            Rect::new(area.x, area.y + y + 2, area.width, 1),
        );
    }
}

/// Renders a one-line button at row `y` of `area`.
pub fn render_button(frame: &mut Frame, area: Rect, y: u16, label: &str, focused: bool) {
    if y >= area.height {
        return;
    }
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!("[ {label} ]"), style))),
        Rect::new(area.x, area.y + y, area.width, 1),
    );
}
