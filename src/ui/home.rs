//! Home menu

use super::components::{render_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::state::HomeEntry;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const MENU_WIDTH: u16 = 36;

/// Draw the home menu, public flows first, then the admin sections
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Foundation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = HomeEntry::all();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let heading = Paragraph::new(Line::from(vec![Span::styled(
        "Help us keep minds healthy",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )]))
    .centered();
    frame.render_widget(heading, chunks[0]);

    // Scroll so the selection stays visible
    let visible = (chunks[1].height / BUTTON_HEIGHT).max(1) as usize;
    let first = app.state.menu_index.saturating_sub(visible - 1);
    let x = chunks[1].x + chunks[1].width.saturating_sub(MENU_WIDTH) / 2;

    let shown = entries.iter().enumerate().skip(first).take(visible);
    for (row, (idx, entry)) in shown.enumerate() {
        let button_area = Rect {
            x,
            y: chunks[1].y + row as u16 * BUTTON_HEIGHT,
            width: MENU_WIDTH.min(chunks[1].width),
            height: BUTTON_HEIGHT,
        };
        let selected = idx == app.state.menu_index;
        render_button(frame, button_area, &entry.label(), selected);
    }
}
