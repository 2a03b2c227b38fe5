//! Confirmation dialog for deleting a record

use super::base::{key_span, render_dialog, DialogConfig};
use crate::state::PendingDelete;
use ratatui::{style::Color, text::Span, Frame};

const MAX_LABEL_LEN: usize = 40;

/// Render a confirmation dialog for a pending delete
pub fn render_confirm_dialog(frame: &mut Frame, pending: &PendingDelete) {
    let message = format!(
        "Delete \"{}\" from {}? This cannot be undone.",
        truncate_string(&pending.label, MAX_LABEL_LEN),
        pending.kind.label().to_lowercase()
    );
    let hint = vec![
        key_span("y"),
        Span::raw(" delete  "),
        key_span("n"),
        Span::raw("/"),
        key_span("Esc"),
        Span::raw(" cancel"),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title: "Confirm Delete",
            accent: Color::Red,
            message: &message,
            hint,
            max_width: 56,
        },
    );
}

/// Truncate a string to a maximum number of characters with ellipsis
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
