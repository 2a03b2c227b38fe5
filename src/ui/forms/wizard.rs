//! Wizard page: progress indicator, the current step's fields, help text
//!
//! Single-step admin forms use the same page without the step list.

use super::field_renderer::{draw_field, field_height, FieldView};
use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::{FormController, FormMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the mounted form
pub fn draw_wizard(frame: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.state.form.as_ref() else {
        return;
    };

    let title = match form.mode() {
        FormMode::Create => format!(" {} ", form.definition().title),
        FormMode::Edit => format!(" Edit {} ", form.definition().title.to_lowercase()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = form.fields_on_step();
    let mut constraints = vec![Constraint::Length(2)]; // Progress
    constraints.extend(fields.iter().map(|f| Constraint::Length(field_height(f))));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1)); // Help text

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);

    frame.render_widget(Paragraph::new(progress_line(form)), chunks[0]);

    for (idx, def) in fields.iter().enumerate() {
        let view = FieldView {
            def,
            value: form.state.value(def.name),
            error: form.state.error(def.name),
            is_active: idx == form.active_field,
            option_cursor: form.option_cursor,
        };
        draw_field(frame, chunks[idx + 1], &view);
    }

    if let Some(help_area) = chunks.last() {
        frame.render_widget(Paragraph::new(help_line(form)), *help_area);
    }
}

/// `Step 2 of 3  ✓ Donor details › ● Payment receipt › ○ Review`
fn progress_line(form: &FormController) -> Line<'static> {
    let current = form.state.current_step;
    let steps = &form.definition().steps;
    if steps.len() <= 1 {
        return Line::from("");
    }

    let mut spans = vec![Span::styled(
        format!("Step {current} of {}  ", steps.len()),
        Style::default().fg(Color::DarkGray),
    )];
    for (idx, step) in steps.iter().enumerate() {
        let number = idx + 1;
        let (marker, style) = if number < current {
            ("✓", Style::default().fg(Color::Green))
        } else if number == current {
            (
                "●",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        if idx > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(format!("{marker} {}", step.label), style));
    }
    Line::from(spans)
}

fn help_line(form: &FormController) -> Line<'static> {
    let text = if form.state.is_submitting {
        "Submitting, please wait…".to_string()
    } else if form.state.is_final_step() {
        format!("Press {SUBMIT_SHORTCUT} to submit")
    } else {
        "Press Enter on the last field or PgDn to continue".to_string()
    };
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}
