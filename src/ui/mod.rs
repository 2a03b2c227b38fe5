//! UI module for rendering the TUI

mod components;
mod forms;
mod home;
mod layout;
mod resource_list;

use crate::app::App;
use crate::state::View;
use components::{render_confirm_dialog, render_notification_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let main_area = layout::create_layout(frame.area());

    // Draw main content based on current view
    match app.state.current_view {
        View::Home => home::draw(frame, main_area, app),
        View::Wizard => forms::draw_wizard(frame, main_area, app),
        View::Resources(kind) => resource_list::draw(frame, main_area, app, kind),
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Modal overlays, notifications on top
    if let Some(pending) = &app.state.pending_delete {
        render_confirm_dialog(frame, pending);
    }
    if let Some(notification) = app.state.notifications.current() {
        render_notification_dialog(frame, notification, app.state.notifications.len());
    }
}
