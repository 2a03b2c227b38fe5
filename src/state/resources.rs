//! Admin resources and the generic list controller shared by every
//! back-office screen: fetch, search, paginate, optimistic delete.

use super::forms::{AdminForm, FieldValue};
use serde_json::{Map, Value};

/// Back-office collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Blogs,
    News,
    Events,
    Gallery,
    Team,
    Volunteers,
    Donations,
    Feedback,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        Self::Blogs,
        Self::News,
        Self::Events,
        Self::Gallery,
        Self::Team,
        Self::Volunteers,
        Self::Donations,
        Self::Feedback,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Blogs => "Blogs",
            Self::News => "News",
            Self::Events => "Events",
            Self::Gallery => "Gallery",
            Self::Team => "Team",
            Self::Volunteers => "Volunteers",
            Self::Donations => "Donations",
            Self::Feedback => "Feedback",
        }
    }

    /// Path segment used by the backend
    pub fn endpoint_name(&self) -> &'static str {
        match self {
            Self::Blogs => "blog",
            Self::News => "news",
            Self::Events => "event",
            Self::Gallery => "gallery",
            Self::Team => "team",
            Self::Volunteers => "volunteer",
            Self::Donations => "donation",
            Self::Feedback => "contact",
        }
    }

    /// Table columns as (field, header)
    pub fn columns(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Blogs => &[("title", "Title"), ("author", "Author"), ("image", "Image")],
            Self::News => &[("title", "Title"), ("image", "Image")],
            Self::Events => &[("title", "Title"), ("date", "Date"), ("location", "Location")],
            Self::Gallery => &[("title", "Title"), ("image", "Image")],
            Self::Team => &[("name", "Name"), ("role", "Role"), ("image", "Photo")],
            Self::Volunteers => &[
                ("name", "Name"),
                ("email", "Email"),
                ("phone", "Phone"),
                ("availability", "Availability"),
            ],
            Self::Donations => &[
                ("name", "Name"),
                ("email", "Email"),
                ("amount", "Amount"),
                ("receipt", "Receipt"),
            ],
            Self::Feedback => &[("name", "Name"), ("email", "Email"), ("subject", "Subject")],
        }
    }

    /// Fields the search box matches against
    pub fn searchable_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Blogs => &["title", "author", "content"],
            Self::News => &["title", "content"],
            Self::Events => &["title", "location", "description"],
            Self::Gallery => &["title"],
            Self::Team => &["name", "role"],
            Self::Volunteers => &["name", "email", "phone"],
            Self::Donations => &["name", "email", "phone", "amount"],
            Self::Feedback => &["name", "email", "subject", "message"],
        }
    }

    /// Admin form used to create and edit records of this kind
    pub fn admin_form(&self) -> Option<AdminForm> {
        match self {
            Self::Blogs => Some(AdminForm::Blog),
            Self::News => Some(AdminForm::News),
            Self::Events => Some(AdminForm::Event),
            Self::Gallery => Some(AdminForm::Gallery),
            Self::Team => Some(AdminForm::Team),
            Self::Volunteers | Self::Donations | Self::Feedback => None,
        }
    }

    /// Whether the back-office can create and edit records of this kind
    pub fn is_editable(&self) -> bool {
        self.admin_form().is_some()
    }
}

/// One backend record
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Record {
    /// Parse an object; the id comes from `_id` or `id`, string or number
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?.clone();
        let id = ["_id", "id"].iter().find_map(|key| match fields.get(*key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })?;
        Some(Self { id, fields })
    }

    /// Parse a list, skipping entries without an id
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        value
            .as_array()
            .map(|items| items.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default()
    }

    /// Field rendered as text; arrays are joined, missing fields are empty
    pub fn text(&self, field: &str) -> String {
        match self.fields.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    }

    /// Values for pre-populating an edit form. Media paths are not form
    /// values; the form keeps an empty file slot.
    pub fn form_values(&self) -> Vec<(String, FieldValue)> {
        self.fields
            .iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key.clone(), FieldValue::text(s.clone()))),
                Value::Number(n) => Some((key.clone(), FieldValue::text(n.to_string()))),
                Value::Array(items) => Some((
                    key.clone(),
                    FieldValue::MultiSelect(
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect(),
                    ),
                )),
                _ => None,
            })
            .collect()
    }

    fn matches(&self, query: &str, fields: &[&str]) -> bool {
        fields
            .iter()
            .any(|f| self.text(f).to_lowercase().contains(query))
    }
}

/// A record taken out optimistically, kept for rollback
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub index: usize,
    pub record: Record,
}

/// List state for one resource screen
#[derive(Debug, Clone)]
pub struct ResourceList {
    pub kind: ResourceKind,
    pub records: Vec<Record>,
    pub query: String,
    /// 0-indexed
    pub page: usize,
    pub page_size: usize,
    /// Selection within the visible page
    pub selected: usize,
    pub loading: bool,
}

impl ResourceList {
    pub fn new(kind: ResourceKind, page_size: usize) -> Self {
        Self {
            kind,
            records: Vec::new(),
            query: String::new(),
            page: 0,
            page_size: page_size.max(1),
            selected: 0,
            loading: false,
        }
    }

    pub fn load(&mut self, records: Vec<Record>) {
        self.records = records;
        self.loading = false;
        self.clamp();
    }

    /// Change the search text; always returns to the first page
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 0;
        self.selected = 0;
    }

    pub fn filtered(&self) -> Vec<&Record> {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return self.records.iter().collect();
        }
        let fields = self.kind.searchable_fields();
        self.records
            .iter()
            .filter(|r| r.matches(&query, fields))
            .collect()
    }

    /// At least one page, even when empty
    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size).max(1)
    }

    pub fn visible(&self) -> Vec<&Record> {
        self.filtered()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.visible().get(self.selected).copied()
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Remove a record before the backend confirms the delete
    pub fn remove_optimistic(&mut self, id: &str) -> Option<Removed> {
        let index = self.records.iter().position(|r| r.id == id)?;
        let record = self.records.remove(index);
        self.clamp();
        Some(Removed { index, record })
    }

    /// Put back a record whose delete failed, unless a reload already did
    pub fn restore(&mut self, removed: Removed) {
        if self.records.iter().any(|r| r.id == removed.record.id) {
            return;
        }
        let index = removed.index.min(self.records.len());
        self.records.insert(index, removed.record);
    }

    /// Replace a record with the same id or append it
    pub fn upsert(&mut self, record: Record) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    fn clamp(&mut self) {
        let last_page = self.page_count() - 1;
        if self.page > last_page {
            self.page = last_page;
        }
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
