//! Form field value objects

use std::path::{Path, PathBuf};

/// Sentinel stored in the donation `amount` field when the donor picks
/// "custom amount" instead of a preset.
pub const CUSTOM_AMOUNT: &str = "custom";

/// A local file attached to a form. Bytes are read only when submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub file_name: String,
}

impl FileHandle {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name }
    }

    /// Lowercased file extension, empty when there is none
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    MultiSelect(Vec<String>),
    File(Option<FileHandle>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn file(path: impl AsRef<Path>) -> Self {
        FieldValue::File(Some(FileHandle::from_path(path)))
    }

    /// Empty means blank text, no selected entries, or no attached file
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::MultiSelect(items) => items.is_empty(),
            FieldValue::File(handle) => handle.is_none(),
        }
    }

    /// Get the text value (returns empty string for other variants)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    pub fn as_multi(&self) -> &[String] {
        match self {
            FieldValue::MultiSelect(items) => items,
            _ => &[],
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            FieldValue::File(handle) => handle.as_ref(),
            _ => None,
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::MultiSelect(items) => items.join(", "),
            FieldValue::File(Some(handle)) => handle.path.display().to_string(),
            FieldValue::File(None) => String::new(),
        }
    }
}

/// How a field is edited and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    /// Exactly one of the options
    Choice(&'static [&'static str]),
    /// Any number of the options
    MultiChoice(&'static [&'static str]),
    /// Path to a local file
    File,
    /// Preset amounts plus a "custom" option backed by `customAmount`
    Amount(&'static [&'static str]),
}

/// Static configuration of a single form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::Multiline)
    }

    /// Value a freshly mounted form holds for this field
    pub fn empty_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::MultiChoice(_) => FieldValue::MultiSelect(Vec::new()),
            FieldKind::File => FieldValue::File(None),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// Options for choice-like fields (empty otherwise)
    pub fn options(&self) -> &'static [&'static str] {
        match self.kind {
            FieldKind::Choice(o) | FieldKind::MultiChoice(o) | FieldKind::Amount(o) => o,
            _ => &[],
        }
    }
}
