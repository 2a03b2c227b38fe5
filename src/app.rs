//! Application state and core logic

use crate::api::{ApiClient, ApiClientTrait, ApiReply, SubmissionError};
use crate::config::ApiSettings;
use crate::platform::is_submit_modifier;
use crate::state::forms::admin;
use crate::state::{
    AppState, Completion, FormController, HomeEntry, Notification, PendingDelete, Record,
    Removed, ResourceKind, View,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Outcomes of background requests, drained by the UI loop
#[derive(Debug)]
pub enum AppEvent {
    Submission {
        session: Uuid,
        result: Result<ApiReply, SubmissionError>,
    },
    ResourcesLoaded {
        kind: ResourceKind,
        result: Result<Vec<Record>, SubmissionError>,
    },
    Deleted {
        kind: ResourceKind,
        removed: Removed,
        result: Result<ApiReply, SubmissionError>,
    },
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Backend client shared with spawned requests
    api: Arc<dyn ApiClientTrait>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App talking to the configured backend
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let api = ApiClient::new(settings)?;
        Ok(Self::with_client(
            Arc::new(api),
            AppState::new(settings.page_size, settings.image_base_url.clone()),
        ))
    }

    pub fn with_client(api: Arc<dyn ApiClientTrait>, state: AppState) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state,
            api,
            events_tx,
            events_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Handle every outcome that has arrived since the last tick
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Submission { session, result } => self.on_submission(session, result),
            AppEvent::ResourcesLoaded { kind, result } => {
                let list = self.state.resource_list_mut(kind);
                list.loading = false;
                match result {
                    Ok(records) => list.load(records),
                    Err(e) => {
                        warn!("Failed to load {}: {e}", kind.label());
                        self.state
                            .push_notification(Notification::error(e.user_message()));
                    }
                }
            }
            AppEvent::Deleted {
                kind,
                removed,
                result,
            } => match result {
                Ok(reply) => {
                    info!("Deleted {} record {}", kind.label(), removed.record.id);
                    let message = reply
                        .message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| "Deleted successfully.".to_string());
                    self.state.push_notification(Notification::success(message));
                }
                Err(e) => {
                    warn!("Delete of {} record failed, restoring: {e}", kind.label());
                    self.state.resource_list_mut(kind).restore(removed);
                    self.state
                        .push_notification(Notification::error(e.user_message()));
                }
            },
        }
    }

    fn on_submission(&mut self, session: Uuid, result: Result<ApiReply, SubmissionError>) {
        if !self.state.is_current_session(session) {
            debug!("Ignoring response for closed form session {session}");
            return;
        }
        let Some(form) = self.state.form.as_mut() else {
            return;
        };

        let saved = result
            .as_ref()
            .ok()
            .and_then(|reply| reply.data.as_ref())
            .and_then(Record::from_value);
        let (completion, notification) = form.finish_submit(result);
        self.state.push_notification(notification);

        match completion {
            Completion::Close => {
                self.state.close_form();
                if let Some(kind) = self.state.active_kind() {
                    if let Some(record) = saved {
                        self.state.resource_list_mut(kind).upsert(record);
                    }
                    self.load_resources(kind);
                }
            }
            Completion::Reset => {
                if let View::Resources(kind) = self.state.return_view {
                    self.load_resources(kind);
                }
            }
            Completion::Retry => {}
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Notification dialog is modal
        if !self.state.notifications.is_empty() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.notifications.dismiss();
            }
            return Ok(());
        }

        // Confirm dialog is modal
        if self.state.pending_delete.is_some() {
            self.handle_confirm_key(key);
            return Ok(());
        }

        match self.state.current_view {
            View::Home => self.handle_home_key(key),
            View::Wizard => self.handle_wizard_key(key),
            View::Resources(kind) => self.handle_resources_key(kind, key),
        }
        Ok(())
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.state.menu_next(),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => self.state.menu_prev(),
            KeyCode::Enter => {
                let Some(entry) = self.state.selected_entry() else {
                    return;
                };
                match entry {
                    HomeEntry::Manage(kind) => {
                        self.state.open_resources(kind);
                        self.load_resources(kind);
                    }
                    public => {
                        if let Some(form) = public.form() {
                            self.state.open_form(form);
                        }
                    }
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            _ => {}
        }
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) {
        let Some(form) = self.state.form.as_mut() else {
            self.state.current_view = View::Home;
            return;
        };
        let field = form.active_field_def();
        let is_choice = field.is_some_and(|f| !f.options().is_empty());
        let is_multiline = field.is_some_and(|f| f.is_multiline());

        match key.code {
            KeyCode::Esc => {
                if form.state.is_submitting {
                    debug!("Form closed while a submission is in flight");
                }
                self.state.close_form();
            }
            KeyCode::Char('s') if is_submit_modifier(key.modifiers) => self.start_submit(),
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::PageDown => self.advance_or_submit(),
            KeyCode::PageUp => form.retreat(),
            KeyCode::Up | KeyCode::Left if is_choice => form.move_option(false),
            KeyCode::Down | KeyCode::Right if is_choice => form.move_option(true),
            KeyCode::Enter if is_multiline && !form.is_last_field() => form.input_char('\n'),
            KeyCode::Enter => {
                if form.is_last_field() {
                    self.advance_or_submit();
                } else {
                    form.next_field();
                }
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.input_char(c);
            }
            _ => {}
        }
    }

    /// Advance, or submit when already on the final step
    fn advance_or_submit(&mut self) {
        let Some(form) = self.state.form.as_mut() else {
            return;
        };
        if form.state.is_final_step() {
            self.start_submit();
        } else if let Err(notification) = form.advance() {
            self.state.push_notification(notification);
        }
    }

    /// Validate the mounted form and send it in the background
    pub fn start_submit(&mut self) {
        let Some(form) = self.state.form.as_mut() else {
            return;
        };
        let request = match form.begin_submit() {
            Ok(request) => request,
            Err(blocked) => {
                debug!("Submit blocked: {blocked:?}");
                if let Some(notification) = blocked.notification() {
                    self.state.push_notification(notification);
                }
                return;
            }
        };

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.send(&request.endpoint, request.payload).await;
            let _ = tx.send(AppEvent::Submission {
                session: request.session,
                result,
            });
        });
    }

    fn handle_resources_key(&mut self, kind: ResourceKind, key: KeyEvent) {
        if self.state.search_mode {
            let list = self.state.resource_list_mut(kind);
            match key.code {
                KeyCode::Enter => self.state.search_mode = false,
                KeyCode::Esc => {
                    list.set_query("");
                    self.state.search_mode = false;
                }
                KeyCode::Backspace => {
                    let mut query = list.query.clone();
                    query.pop();
                    list.set_query(query);
                }
                KeyCode::Char(c) => {
                    let query = format!("{}{c}", list.query);
                    list.set_query(query);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.state.current_view = View::Home,
            KeyCode::Char('/') => self.state.search_mode = true,
            KeyCode::Down | KeyCode::Char('j') => self.state.resource_list_mut(kind).select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.state.resource_list_mut(kind).select_prev(),
            KeyCode::Char(']') | KeyCode::Right => self.state.resource_list_mut(kind).next_page(),
            KeyCode::Char('[') | KeyCode::Left => self.state.resource_list_mut(kind).prev_page(),
            KeyCode::Char('r') => self.load_resources(kind),
            KeyCode::Char('n') => {
                if let Some(form) = kind.admin_form() {
                    self.state
                        .open_form(FormController::new(admin::create_definition(form)));
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let Some(form) = kind.admin_form() else {
                    return;
                };
                let list = self.state.resource_list_mut(kind);
                let Some(record) = list.selected_record().cloned() else {
                    return;
                };
                let definition = admin::edit_definition(form);
                self.state
                    .open_form(FormController::edit(definition, &record));
            }
            KeyCode::Char('d') => {
                let list = self.state.resource_list_mut(kind);
                let Some(record) = list.selected_record().cloned() else {
                    return;
                };
                let label = kind
                    .columns()
                    .first()
                    .map(|(field, _)| record.text(field))
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| record.id.clone());
                self.state.pending_delete = Some(PendingDelete {
                    kind,
                    id: record.id,
                    label,
                });
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(pending) = self.state.pending_delete.take() {
                    self.delete_record(pending);
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.state.pending_delete = None,
            _ => {}
        }
    }

    /// Remove the record right away and roll back if the backend refuses
    fn delete_record(&mut self, pending: PendingDelete) {
        let Some(removed) = self
            .state
            .resource_list_mut(pending.kind)
            .remove_optimistic(&pending.id)
        else {
            return;
        };

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.delete(pending.kind, &pending.id).await;
            let _ = tx.send(AppEvent::Deleted {
                kind: pending.kind,
                removed,
                result,
            });
        });
    }

    /// Fetch a resource list in the background
    pub fn load_resources(&mut self, kind: ResourceKind) {
        self.state.resource_list_mut(kind).loading = true;

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.list(kind).await;
            let _ = tx.send(AppEvent::ResourcesLoaded { kind, result });
        });
    }

    /// Wait for the next background outcome and handle it
    #[cfg(test)]
    async fn next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiClientTrait;
    use crate::state::{donation, FieldValue, NotificationKind, FIX_FIELDS_MESSAGE};
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_with(api: MockApiClientTrait) -> App {
        App::with_client(Arc::new(api), AppState::new(2, "http://localhost:8000"))
    }

    fn open_donation(app: &mut App) {
        let form = FormController::new(donation::definition());
        app.state.open_form(form);
    }

    fn current_form(app: &App) -> &FormController {
        app.state.form.as_ref().unwrap()
    }

    fn server_error() -> SubmissionError {
        SubmissionError::Http {
            status: 500,
            message: None,
        }
    }

    fn blog(id: &str, title: &str) -> Record {
        Record::from_value(&json!({ "_id": id, "title": title, "author": "Sam" })).unwrap()
    }

    fn mount_ready_donation(app: &mut App) {
        let mut form = FormController::new(donation::definition());
        let state = &mut form.state;
        state.set_value("name", FieldValue::text("Ada Lovelace"));
        state.set_value("email", FieldValue::text("ada@example.org"));
        state.set_value("phone", FieldValue::text("0123456789"));
        state.set_value("amount", FieldValue::text("1000"));
        form.advance().unwrap();
        let receipt = FieldValue::file("/tmp/receipt.png");
        form.state.set_value("receipt", receipt);
        form.advance().unwrap();
        app.state.open_form(form);
    }

    mod notifications {
        use super::*;

        #[test]
        fn test_dialog_is_modal() {
            let mut app = app_with(MockApiClientTrait::new());
            app.state.push_notification(Notification::error("boom"));
            app.handle_key(key(KeyCode::Char('q'))).unwrap();
            assert!(!app.should_quit());

            app.handle_key(key(KeyCode::Esc)).unwrap();
            assert!(app.state.notifications.is_empty());
        }
    }

    mod wizard {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_blocked_advance_notifies() {
            let mut app = app_with(MockApiClientTrait::new());
            open_donation(&mut app);
            app.handle_key(key(KeyCode::PageDown)).unwrap();

            let current = app.state.notifications.current().cloned().unwrap();
            assert_eq!(current.message, FIX_FIELDS_MESSAGE);
            assert_eq!(current_form(&app).state.current_step, 1);
        }

        #[tokio::test]
        async fn test_submit_success_resets_form() {
            let mut api = MockApiClientTrait::new();
            api.expect_send()
                .times(1)
                .returning(|_, _| Ok(ApiReply::ok("saved")));
            let mut app = app_with(api);
            mount_ready_donation(&mut app);

            app.handle_key(ctrl('s')).unwrap();
            assert!(current_form(&app).state.is_submitting);
            // Second press while in flight is ignored
            app.handle_key(ctrl('s')).unwrap();

            app.next_event().await;
            let form = app.state.form.as_ref().unwrap();
            assert_eq!(form.state.current_step, 1);
            assert!(!form.state.is_submitting);
            assert_eq!(
                app.state.notifications.current().map(|n| n.kind),
                Some(NotificationKind::Success)
            );
            assert_eq!(app.state.notifications.len(), 1);
        }

        #[tokio::test]
        async fn test_late_response_after_close_is_ignored() {
            let mut api = MockApiClientTrait::new();
            api.expect_send().times(1).returning(|_, _| {
                Err(SubmissionError::Rejected {
                    message: Some("Duplicate transaction".into()),
                })
            });
            let mut app = app_with(api);
            mount_ready_donation(&mut app);

            app.handle_key(ctrl('s')).unwrap();
            app.handle_key(key(KeyCode::Esc)).unwrap();
            assert_eq!(app.state.current_view, View::Home);

            app.next_event().await;
            assert!(app.state.notifications.is_empty());
            assert!(app.state.form.is_none());
        }

        #[test]
        fn test_typing_reaches_focused_field() {
            let mut app = app_with(MockApiClientTrait::new());
            open_donation(&mut app);
            for c in "Ada".chars() {
                app.handle_key(key(KeyCode::Char(c))).unwrap();
            }
            assert_eq!(current_form(&app).state.text("name"), "Ada");
        }
    }

    mod resources {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_opening_list_loads_records() {
            let records = vec![blog("b1", "Hope"), blog("b2", "Rest"), blog("b3", "Calm")];
            let mut api = MockApiClientTrait::new();
            api.expect_list()
                .withf(|kind| *kind == ResourceKind::Blogs)
                .times(1)
                .returning(move |_| Ok(records.clone()));
            let mut app = app_with(api);
            app.state.menu_index = 3; // Manage blogs
            app.handle_key(key(KeyCode::Enter)).unwrap();
            assert_eq!(app.state.current_view, View::Resources(ResourceKind::Blogs));

            app.next_event().await;
            let list = app.state.resource_list(ResourceKind::Blogs).unwrap();
            assert!(!list.loading);
            assert_eq!(list.page_count(), 2);
        }

        #[test]
        fn test_search_mode_filters() {
            let mut app = app_with(MockApiClientTrait::new());
            app.state.open_resources(ResourceKind::Blogs);
            app.state
                .resource_list_mut(ResourceKind::Blogs)
                .load(vec![blog("b1", "Hope"), blog("b2", "Rest")]);

            app.handle_key(key(KeyCode::Char('/'))).unwrap();
            for c in "res".chars() {
                app.handle_key(key(KeyCode::Char(c))).unwrap();
            }
            app.handle_key(key(KeyCode::Enter)).unwrap();

            let list = app.state.resource_list(ResourceKind::Blogs).unwrap();
            assert_eq!(list.filtered().len(), 1);
            assert!(!app.state.search_mode);
        }

        #[tokio::test]
        async fn test_failed_delete_restores_record() {
            let mut api = MockApiClientTrait::new();
            api.expect_delete()
                .withf(|kind, id| *kind == ResourceKind::Blogs && id == "b1")
                .times(1)
                .returning(|_, _| Err(server_error()));
            let mut app = app_with(api);
            app.state.open_resources(ResourceKind::Blogs);
            app.state
                .resource_list_mut(ResourceKind::Blogs)
                .load(vec![blog("b1", "Hope"), blog("b2", "Rest")]);

            app.handle_key(key(KeyCode::Char('d'))).unwrap();
            assert_eq!(
                app.state.pending_delete.as_ref().map(|p| p.label.as_str()),
                Some("Hope")
            );
            app.handle_key(key(KeyCode::Char('y'))).unwrap();
            let list = app.state.resource_list(ResourceKind::Blogs).unwrap();
            assert_eq!(list.records.len(), 1);

            app.next_event().await;
            let list = app.state.resource_list(ResourceKind::Blogs).unwrap();
            assert_eq!(list.records[0].id, "b1");
            assert_eq!(
                app.state.notifications.current().map(|n| n.kind),
                Some(NotificationKind::Error)
            );
        }

        #[test]
        fn test_read_only_kind_cannot_edit() {
            let mut app = app_with(MockApiClientTrait::new());
            app.state.open_resources(ResourceKind::Donations);
            app.state
                .resource_list_mut(ResourceKind::Donations)
                .load(vec![blog("d1", "x")]);
            app.handle_key(key(KeyCode::Char('e'))).unwrap();
            app.handle_key(key(KeyCode::Char('n'))).unwrap();
            assert!(app.state.form.is_none());
        }

        #[test]
        fn test_edit_opens_prefilled_form() {
            let mut app = app_with(MockApiClientTrait::new());
            app.state.open_resources(ResourceKind::Blogs);
            app.state
                .resource_list_mut(ResourceKind::Blogs)
                .load(vec![blog("b1", "Hope")]);
            app.handle_key(key(KeyCode::Char('e'))).unwrap();

            let form = app.state.form.as_ref().unwrap();
            assert_eq!(form.state.text("title"), "Hope");
            assert_eq!(form.state.record_id.as_deref(), Some("b1"));
        }

        #[tokio::test]
        async fn test_saved_edit_updates_row_and_closes() {
            let mut api = MockApiClientTrait::new();
            api.expect_send().times(1).returning(|_, _| {
                Ok(ApiReply {
                    status: true,
                    message: None,
                    data: Some(json!({ "_id": "b1", "title": "Renamed", "author": "Sam" })),
                })
            });
            api.expect_list().returning(|_| Ok(vec![]));
            let mut app = app_with(api);
            app.state.open_resources(ResourceKind::Blogs);
            app.state
                .resource_list_mut(ResourceKind::Blogs)
                .load(vec![blog("b1", "Hope")]);
            app.handle_key(key(KeyCode::Char('e'))).unwrap();
            if let Some(form) = app.state.form.as_mut() {
                form.state.set_value("content", FieldValue::text("Body"));
            }

            app.handle_key(ctrl('s')).unwrap();
            app.next_event().await;

            assert!(app.state.form.is_none());
            assert_eq!(app.state.current_view, View::Resources(ResourceKind::Blogs));
            let list = app.state.resource_list(ResourceKind::Blogs).unwrap();
            assert_eq!(list.records[0].text("title"), "Renamed");
            assert!(list.loading);
        }
    }
}
