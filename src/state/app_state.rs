//! Application state definitions

use super::forms::{admin, donation, volunteer, FormController};
use super::notification::{Notification, Notifications};
use super::resources::{ResourceKind, ResourceList};
use std::collections::HashMap;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    /// A mounted form, wizard or single-step
    Wizard,
    Resources(ResourceKind),
}

/// Entries of the home menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeEntry {
    Donate,
    Volunteer,
    Contact,
    Manage(ResourceKind),
}

impl HomeEntry {
    pub fn all() -> Vec<HomeEntry> {
        let mut entries = vec![Self::Donate, Self::Volunteer, Self::Contact];
        entries.extend(ResourceKind::ALL.into_iter().map(Self::Manage));
        entries
    }

    pub fn label(&self) -> String {
        match self {
            Self::Donate => "Donate".to_string(),
            Self::Volunteer => "Become a volunteer".to_string(),
            Self::Contact => "Contact us".to_string(),
            Self::Manage(kind) => format!("Manage {}", kind.label().to_lowercase()),
        }
    }

    /// Public flows open a form directly
    pub fn form(&self) -> Option<FormController> {
        match self {
            Self::Donate => Some(FormController::new(donation::definition())),
            Self::Volunteer => Some(FormController::new(volunteer::definition())),
            Self::Contact => Some(FormController::new(admin::contact_definition())),
            Self::Manage(_) => None,
        }
    }
}

/// A delete waiting for the user's confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub kind: ResourceKind,
    pub id: String,
    pub label: String,
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    /// Where to return when the mounted form closes
    pub return_view: View,
    pub menu_index: usize,

    // Forms
    pub form: Option<FormController>,

    // Admin lists
    pub resources: HashMap<ResourceKind, ResourceList>,
    pub page_size: usize,
    pub search_mode: bool,
    pub pending_delete: Option<PendingDelete>,

    // UI state
    pub notifications: Notifications,
    pub image_base_url: String,
}

impl AppState {
    pub fn new(page_size: usize, image_base_url: impl Into<String>) -> Self {
        Self {
            page_size,
            image_base_url: image_base_url.into(),
            ..Self::default()
        }
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn menu_next(&mut self) {
        let total = HomeEntry::all().len();
        self.menu_index = (self.menu_index + 1) % total;
    }

    pub fn menu_prev(&mut self) {
        let total = HomeEntry::all().len();
        self.menu_index = (self.menu_index + total - 1) % total;
    }

    pub fn selected_entry(&self) -> Option<HomeEntry> {
        HomeEntry::all().get(self.menu_index).copied()
    }

    /// Mount a form, remembering the current view for when it closes
    pub fn open_form(&mut self, form: FormController) {
        if self.current_view != View::Wizard {
            self.return_view = self.current_view;
        }
        self.form = Some(form);
        self.current_view = View::Wizard;
    }

    /// Drop the mounted form; an in-flight submission becomes stale
    pub fn close_form(&mut self) -> Option<FormController> {
        self.current_view = self.return_view;
        self.return_view = View::Home;
        self.form.take()
    }

    pub fn open_resources(&mut self, kind: ResourceKind) {
        self.search_mode = false;
        self.pending_delete = None;
        self.resource_list_mut(kind);
        self.current_view = View::Resources(kind);
    }

    /// Kind of the list on screen, if any
    pub fn active_kind(&self) -> Option<ResourceKind> {
        match self.current_view {
            View::Resources(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn resource_list(&self, kind: ResourceKind) -> Option<&ResourceList> {
        self.resources.get(&kind)
    }

    pub fn resource_list_mut(&mut self, kind: ResourceKind) -> &mut ResourceList {
        let page_size = self.page_size.max(1);
        self.resources
            .entry(kind)
            .or_insert_with(|| ResourceList::new(kind, page_size))
    }

    /// Whether a response for `session` still belongs to the mounted form
    pub fn is_current_session(&self, session: uuid::Uuid) -> bool {
        self.form.as_ref().is_some_and(|f| f.session() == session)
    }
}
