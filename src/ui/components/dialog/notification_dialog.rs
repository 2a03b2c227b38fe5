//! Notification dialog: the single place success and error messages show

use super::base::{key_span, render_dialog, DialogConfig};
use crate::state::{Notification, NotificationKind};
use ratatui::{style::Color, text::Span, Frame};

fn accent(kind: NotificationKind) -> Color {
    match kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Warning => Color::Yellow,
        NotificationKind::Error => Color::Red,
    }
}

/// Render the front notification; `pending` counts it too
pub fn render_notification_dialog(frame: &mut Frame, notification: &Notification, pending: usize) {
    let mut hint = vec![
        Span::raw("Press "),
        key_span("Enter"),
        Span::raw(" or "),
        key_span("Esc"),
        Span::raw(" to dismiss"),
    ];
    if pending > 1 {
        hint.push(Span::raw(format!("  ({} more)", pending - 1)));
    }

    render_dialog(
        frame,
        DialogConfig {
            title: notification.kind.title(),
            accent: accent(notification.kind),
            message: &notification.message,
            hint,
            max_width: 60,
        },
    );
}
