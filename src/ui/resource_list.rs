//! Admin resource list: search header, paged table, page indicator

use crate::api::resolve_image_url;
use crate::app::App;
use crate::state::{Record, ResourceKind, ResourceList};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

/// Columns holding a media path shown as a full URL
const MEDIA_FIELDS: &[&str] = &["image", "receipt", "document"];

/// Draw the list for `kind`
pub fn draw(frame: &mut Frame, area: Rect, app: &App, kind: ResourceKind) {
    let block = Block::default()
        .title(format!(" {} ", kind.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(list) = app.state.resource_list(kind) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Search
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Page indicator
        ])
        .split(inner);

    frame.render_widget(search_line(list, app.state.search_mode), chunks[0]);

    let dim = Style::default().fg(Color::DarkGray);

    let visible = list.visible();
    if visible.is_empty() {
        let message = if list.loading {
            "Loading…"
        } else if list.query.trim().is_empty() {
            "No records yet."
        } else {
            "No records match your search."
        };
        frame.render_widget(Paragraph::new(message).style(dim), chunks[1]);
    } else {
        draw_table(frame, chunks[1], app, list, &visible);
    }

    let indicator = format!(
        "Page {} of {}  ·  {} record(s)",
        list.page + 1,
        list.page_count(),
        list.filtered().len()
    );
    frame.render_widget(Paragraph::new(Span::styled(indicator, dim)), chunks[2]);
}

fn search_line(list: &ResourceList, editing: bool) -> Paragraph<'static> {
    let label_style = if editing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut spans = vec![
        Span::styled("Search: ", label_style),
        Span::raw(list.query.clone()),
    ];
    if editing {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    } else if list.query.is_empty() {
        let hint = Style::default().fg(Color::DarkGray);
        spans.push(Span::styled("press / to search", hint));
    }
    Paragraph::new(Line::from(spans))
}

fn cell_text(app: &App, record: &Record, field: &str) -> String {
    let text = record.text(field);
    if MEDIA_FIELDS.contains(&field) {
        resolve_image_url(&app.state.image_base_url, &text)
    } else {
        // Long bodies would push every other column off screen
        text.lines().next().unwrap_or_default().to_string()
    }
}

fn draw_table(frame: &mut Frame, area: Rect, app: &App, list: &ResourceList, visible: &[&Record]) {
    let columns = list.kind.columns();

    let header = Row::new(columns.iter().map(|(_, title)| {
        Cell::from(*title).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = visible.iter().enumerate().map(|(idx, record)| {
        let style = if idx == list.selected {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default()
        };
        Row::new(
            columns
                .iter()
                .map(|(field, _)| Cell::from(cell_text(app, record, field))),
        )
        .style(style)
    });

    let ratio = Constraint::Ratio(1, columns.len().max(1) as u32);
    let widths = vec![ratio; columns.len()];
    let table = Table::new(rows, widths).header(header).column_spacing(2);
    frame.render_widget(table, area);
}
