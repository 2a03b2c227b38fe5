//! Transport payloads built from form values

use super::error::SubmissionError;
use crate::state::{FieldValue, FileHandle, FormValues};
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};

/// One multipart entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPart {
    Text(String),
    File(FileHandle),
}

/// Body of a form submission
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Map<String, Value>),
    /// Ordered parts; a key repeats for multi-select values
    Multipart(Vec<(String, PayloadPart)>),
}

impl Payload {
    /// Multipart as soon as any field holds a file, JSON otherwise.
    /// Empty file slots are left out entirely.
    pub fn from_values(values: &FormValues, record_id: Option<&str>) -> Self {
        let has_file = values
            .values()
            .any(|v| matches!(v, FieldValue::File(Some(_))));

        if has_file {
            let mut parts = Vec::new();
            if let Some(id) = record_id {
                parts.push(("id".to_string(), PayloadPart::Text(id.to_string())));
            }
            for (key, value) in values {
                match value {
                    FieldValue::Text(s) => parts.push((key.clone(), PayloadPart::Text(s.clone()))),
                    FieldValue::MultiSelect(items) => parts.extend(
                        items
                            .iter()
                            .map(|item| (key.clone(), PayloadPart::Text(item.clone()))),
                    ),
                    FieldValue::File(Some(handle)) => {
                        parts.push((key.clone(), PayloadPart::File(handle.clone())))
                    }
                    FieldValue::File(None) => {}
                }
            }
            Payload::Multipart(parts)
        } else {
            let mut map = Map::new();
            if let Some(id) = record_id {
                map.insert("id".to_string(), Value::String(id.to_string()));
            }
            for (key, value) in values {
                match value {
                    FieldValue::Text(s) => {
                        map.insert(key.clone(), Value::String(s.clone()));
                    }
                    FieldValue::MultiSelect(items) => {
                        map.insert(
                            key.clone(),
                            Value::Array(items.iter().cloned().map(Value::String).collect()),
                        );
                    }
                    FieldValue::File(_) => {}
                }
            }
            Payload::Json(map)
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Payload::Multipart(_))
    }

    /// First text value sent under `key`
    #[cfg(test)]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self {
            Payload::Json(map) => map.get(key).and_then(Value::as_str),
            Payload::Multipart(parts) => parts.iter().find_map(|(k, part)| match part {
                PayloadPart::Text(s) if k == key => Some(s.as_str()),
                _ => None,
            }),
        }
    }

    /// Every text value sent under `key`
    #[cfg(test)]
    pub fn texts(&self, key: &str) -> Vec<&str> {
        match self {
            Payload::Json(map) => match map.get(key) {
                Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
                Some(Value::String(s)) => vec![s.as_str()],
                _ => Vec::new(),
            },
            Payload::Multipart(parts) => parts
                .iter()
                .filter_map(|(k, part)| match part {
                    PayloadPart::Text(s) if k == key => Some(s.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn file(&self, key: &str) -> Option<&FileHandle> {
        match self {
            Payload::Json(_) => None,
            Payload::Multipart(parts) => parts.iter().find_map(|(k, part)| match part {
                PayloadPart::File(handle) if k == key => Some(handle),
                _ => None,
            }),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Payload::Json(map) => map.contains_key(key),
            Payload::Multipart(parts) => parts.iter().any(|(k, _)| k == key),
        }
    }
}

fn mime_for(handle: &FileHandle) -> &'static str {
    match handle.extension().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Read attached files and assemble a reqwest multipart form
pub async fn into_form(parts: Vec<(String, PayloadPart)>) -> Result<Form, SubmissionError> {
    let mut form = Form::new();
    for (key, part) in parts {
        form = match part {
            PayloadPart::Text(s) => form.text(key, s),
            PayloadPart::File(handle) => {
                let bytes = tokio::fs::read(&handle.path).await.map_err(|source| {
                    SubmissionError::Attachment {
                        path: handle.path.display().to_string(),
                        source,
                    }
                })?;
                let file_part = Part::bytes(bytes)
                    .file_name(handle.file_name.clone())
                    .mime_str(mime_for(&handle))
                    .map_err(SubmissionError::Transport)?;
                form.part(key, file_part)
            }
        };
    }
    Ok(form)
}
