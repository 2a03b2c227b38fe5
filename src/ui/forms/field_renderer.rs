//! Field rendering utilities for forms

use crate::state::{
    FieldDef, FieldKind, FieldValue, FormController, CUSTOM_AMOUNT, CUSTOM_AMOUNT_LABEL,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows a field needs, borders included
pub fn field_height(def: &FieldDef) -> u16 {
    if def.is_multiline() {
        5
    } else {
        3
    }
}

/// Everything needed to draw one field
pub struct FieldView<'a> {
    pub def: &'a FieldDef,
    pub value: Option<&'a FieldValue>,
    /// Empty when valid or not yet validated
    pub error: &'a str,
    pub is_active: bool,
    /// Highlighted option, meaningful only when active
    pub option_cursor: usize,
}

/// Draw a form field with its inline error
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FieldView) {
    let has_error = !field.error.is_empty();
    let border_style = match (field.is_active, has_error) {
        (_, true) => Style::default().fg(Color::Red),
        (true, false) => Style::default().fg(Color::Cyan),
        (false, false) => Style::default().fg(Color::DarkGray),
    };

    let mut block = Block::default()
        .title(format!(" {} ", field.def.label))
        .borders(Borders::ALL)
        .border_style(border_style);
    if has_error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", field.error),
            Style::default().fg(Color::Red),
        )));
    }

    let content = match field.def.kind {
        FieldKind::Choice(_) | FieldKind::MultiChoice(_) | FieldKind::Amount(_) => {
            Paragraph::new(option_line(field))
        }
        FieldKind::Text | FieldKind::Multiline | FieldKind::File => text_content(field),
    };

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

fn text_content<'a>(field: &FieldView<'a>) -> Paragraph<'a> {
    let value = field
        .value
        .map(FieldValue::display_value)
        .unwrap_or_default();
    let cursor = Span::styled(
        if field.is_active { "▌" } else { "" },
        Style::default().fg(Color::Cyan),
    );

    if value.is_empty() && !field.is_active {
        let placeholder = match field.def.kind {
            FieldKind::File => "(path to file)",
            _ => "(empty)",
        };
        let dim = Style::default().fg(Color::DarkGray);
        return Paragraph::new(Span::styled(placeholder, dim));
    }

    let style = if field.is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut lines: Vec<Line> = value
        .split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), style)))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.spans.push(cursor);
    }
    Paragraph::new(lines)
}

fn is_selected(field: &FieldView, option: &str) -> bool {
    let Some(value) = field.value else {
        return false;
    };
    match field.def.kind {
        FieldKind::MultiChoice(_) => value.as_multi().iter().any(|v| v == option),
        FieldKind::Amount(_) if option == CUSTOM_AMOUNT_LABEL => value.as_text() == CUSTOM_AMOUNT,
        _ => value.as_text() == option,
    }
}

/// Options on one line: `(•)` for single choice, `[x]` for multi
fn option_line<'a>(field: &FieldView<'a>) -> Line<'a> {
    let multi = matches!(field.def.kind, FieldKind::MultiChoice(_));
    let mut spans = Vec::new();

    let options = FormController::options_for(field.def);
    for (idx, option) in options.into_iter().enumerate() {
        let marker = match (multi, is_selected(field, option)) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(•)",
            (false, false) => "( )",
        };
        let mut style = Style::default().fg(Color::Gray);
        if field.is_active && idx == field.option_cursor {
            style = Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!("{marker} {option}"), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}
