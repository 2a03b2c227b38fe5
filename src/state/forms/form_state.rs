//! Form state store: values, touched flags, errors and the current step

use super::definition::FormDefinition;
use super::field::{FieldKind, FieldValue, CUSTOM_AMOUNT};
use super::rules::FormValues;
use super::sanitize::sanitize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Mutable record of one in-progress submission
#[derive(Debug, Clone)]
pub struct FormState {
    definition: Arc<FormDefinition>,
    pub values: FormValues,
    /// Last computed message per field; empty or absent means valid
    pub errors: BTreeMap<String, String>,
    pub touched: BTreeSet<String>,
    /// 1-indexed
    pub current_step: usize,
    pub is_submitting: bool,
    /// Id of the record being edited
    pub record_id: Option<String>,
}

impl FormState {
    pub fn new(definition: Arc<FormDefinition>) -> Self {
        let values = definition.empty_values();
        Self {
            definition,
            values,
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            current_step: 1,
            is_submitting: false,
            record_id: None,
        }
    }

    /// Pre-populate from an existing record (admin edit forms). Unknown
    /// fields are ignored and values are stored as-is, without sanitising.
    /// File fields stay empty: the stored file is kept unless replaced.
    pub fn from_record(
        definition: Arc<FormDefinition>,
        id: impl Into<String>,
        record: impl IntoIterator<Item = (String, FieldValue)>,
    ) -> Self {
        let mut state = Self::new(definition);
        for (field, value) in record {
            let editable = state
                .definition
                .field(&field)
                .is_some_and(|def| def.kind != FieldKind::File);
            if editable {
                state.values.insert(field, value);
            }
        }
        state.record_id = Some(id.into());
        state
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    pub fn step_count(&self) -> usize {
        self.definition.step_count()
    }

    pub fn is_final_step(&self) -> bool {
        self.current_step >= self.step_count()
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text of a field, empty for missing or non-text fields
    pub fn text(&self, field: &str) -> &str {
        self.value(field).map(FieldValue::as_text).unwrap_or("")
    }

    /// Read-only view of the last computed error for a field
    pub fn error(&self, field: &str) -> &str {
        self.errors.get(field).map(String::as_str).unwrap_or("")
    }

    #[cfg(test)]
    pub fn has_errors(&self) -> bool {
        self.errors.values().any(|m| !m.is_empty())
    }

    /// The selected preset donation amount, if any
    #[cfg(test)]
    pub fn preset_amount(&self) -> Option<&str> {
        let amount = self.text("amount");
        (!amount.is_empty() && amount != CUSTOM_AMOUNT).then_some(amount)
    }

    /// Store a sanitised value, keep preset/custom amounts exclusive, and
    /// re-validate if the user has already interacted with the field.
    pub fn set_value(&mut self, field: &str, value: FieldValue) {
        let value = sanitize(field, value);
        let mut changed = vec![field.to_string()];

        match field {
            "amount" if !value.is_empty() && value.as_text() != CUSTOM_AMOUNT => {
                if self.values.contains_key("customAmount") {
                    self.values
                        .insert("customAmount".to_string(), FieldValue::Text(String::new()));
                    changed.push("customAmount".to_string());
                }
            }
            "customAmount" => {
                if !value.is_empty() && self.text("amount") != CUSTOM_AMOUNT {
                    self.values
                        .insert("amount".to_string(), FieldValue::text(CUSTOM_AMOUNT));
                }
                // The amount rule reads customAmount
                changed.push("amount".to_string());
            }
            _ => {}
        }

        self.values.insert(field.to_string(), value);

        for name in changed {
            if self.touched.contains(&name) {
                self.validate_field(&name);
            }
        }
    }

    /// Mark a field as interacted with (blur) and validate it
    pub fn set_touched(&mut self, field: &str) {
        self.touched.insert(field.to_string());
        self.validate_field(field);
    }

    /// Run the validator for one field and record the result
    pub fn validate_field(&mut self, field: &str) -> bool {
        let message = {
            let value = self
                .values
                .get(field)
                .cloned()
                .unwrap_or_default();
            self.definition.rules.validate(field, &value, &self.values)
        };
        let valid = message.is_empty();
        self.errors.insert(field.to_string(), message);
        valid
    }

    /// Return to the initial empty shape
    pub fn reset(&mut self) {
        self.values = self.definition.empty_values();
        self.errors.clear();
        self.touched.clear();
        self.current_step = 1;
        self.is_submitting = false;
    }

    /// Jump to a step, clamped into `1..=step_count`
    pub fn go_to_step(&mut self, step: usize) {
        self.current_step = step.clamp(1, self.step_count().max(1));
    }
}
