//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split off the bottom line for the status bar
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::raw(" ")];

    // View-specific hints
    let hints = get_view_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if app
        .state
        .form
        .as_ref()
        .is_some_and(|f| f.state.is_submitting)
    {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "Submitting…",
            Style::default().fg(Color::Yellow),
        ));
    }

    let loading = app
        .state
        .active_kind()
        .and_then(|k| app.state.resource_list(k))
        .is_some_and(|l| l.loading);
    if loading {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("Loading…", Style::default().fg(Color::Yellow)));
    }

    let quit_hint = " ^C:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Render quit hint on the right
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    match app.state.current_view {
        View::Home => "j/k:nav  Enter:open  q:quit".to_string(),
        View::Wizard => {
            let final_step = app
                .state
                .form
                .as_ref()
                .is_some_and(|f| f.state.is_final_step());
            let step_hint = if final_step {
                format!("PgUp:back  {SUBMIT_SHORTCUT}:submit")
            } else {
                "PgUp/PgDn:step".to_string()
            };
            format!("Tab:next  ←→:option  Space:pick  {step_hint}  Esc:cancel")
        }
        View::Resources(_) if app.state.search_mode => {
            "type to search  Enter:done  Esc:clear".to_string()
        }
        View::Resources(kind) if kind.is_editable() => {
            "j/k:nav  [/]:page  /:search  n:new  e:edit  d:delete  r:reload  Esc:back".to_string()
        }
        View::Resources(_) => {
            "j/k:nav  [/]:page  /:search  d:delete  r:reload  Esc:back".to_string()
        }
    }
}
