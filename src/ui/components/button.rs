//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Render a menu button; the selected one gets a marker and accent color
pub fn render_button(frame: &mut Frame, area: Rect, label: &str, is_selected: bool) {
    let (border_style, text_style, marker) = if is_selected {
        (
            Style::default().fg(Color::Cyan),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            "▸",
        )
    } else {
        (Style::default().fg(Color::DarkGray), Style::default(), " ")
    };

    let paragraph = Paragraph::new(format!("{marker} {label}")).style(text_style);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(paragraph.block(block), area);
}
