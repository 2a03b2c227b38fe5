//! Static form configuration shared by every instance of a form

use super::field::FieldDef;
use super::rules::{FormValues, RuleTable};
use crate::api::Endpoint;

/// One page of a wizard
#[derive(Debug, Clone)]
pub struct StepDefinition {
    /// Shown in the progress indicator
    pub label: &'static str,
    /// Fields validated before leaving this step
    pub owned_fields: Vec<&'static str>,
}

impl StepDefinition {
    pub fn new(label: &'static str, owned_fields: &[&'static str]) -> Self {
        Self {
            label,
            owned_fields: owned_fields.to_vec(),
        }
    }
}

/// Everything that distinguishes one form from another
#[derive(Debug, Clone)]
pub struct FormDefinition {
    pub title: &'static str,
    pub fields: Vec<FieldDef>,
    pub steps: Vec<StepDefinition>,
    pub rules: RuleTable,
    pub create_endpoint: Endpoint,
    /// Present for forms that also edit existing records
    pub update_endpoint: Option<Endpoint>,
    /// Rewrites values right before they are serialised
    pub prepare_payload: Option<fn(&FormValues) -> FormValues>,
    pub success_message: &'static str,
}

impl FormDefinition {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// 1-indexed step lookup
    pub fn step(&self, step: usize) -> Option<&StepDefinition> {
        step.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field definitions shown on the given step, in declaration order
    pub fn fields_for_step(&self, step: usize) -> Vec<&FieldDef> {
        let Some(def) = self.step(step) else {
            return Vec::new();
        };
        def.owned_fields
            .iter()
            .filter_map(|name| self.field(name))
            .collect()
    }

    /// Initial values of a freshly mounted form
    pub fn empty_values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.empty_value()))
            .collect()
    }
}
