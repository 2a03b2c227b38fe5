//! Donation wizard: donor details, payment receipt, review

use super::definition::{FormDefinition, StepDefinition};
use super::field::{FieldDef, FieldKind, FieldValue, CUSTOM_AMOUNT};
use super::rules::{
    email_rule, has_extension, name_rule, phone_rule, FieldRule, FormValues, RuleTable,
    IMAGE_EXTENSIONS,
};
use crate::api::Endpoint;
use std::sync::{Arc, LazyLock};

/// Preset donation amounts offered on the first step
pub const PRESET_AMOUNTS: &[&str] = &["500", "1000", "2500", "5000"];

static DEFINITION: LazyLock<Arc<FormDefinition>> = LazyLock::new(|| Arc::new(build()));

/// Shared donation form definition
pub fn definition() -> Arc<FormDefinition> {
    DEFINITION.clone()
}

fn positive_amount(raw: &str) -> bool {
    raw.parse::<u64>().is_ok_and(|n| n > 0)
}

/// A preset must be a positive number; the custom option needs a
/// positive `customAmount` alongside it.
fn amount_is_valid(value: &FieldValue, values: &FormValues) -> bool {
    match value.as_text() {
        CUSTOM_AMOUNT => values
            .get("customAmount")
            .is_some_and(|v| positive_amount(v.as_text())),
        preset => positive_amount(preset),
    }
}

fn receipt_is_image(value: &FieldValue, _: &FormValues) -> bool {
    has_extension(value, IMAGE_EXTENSIONS)
}

/// Send the amount actually donated; `customAmount` never leaves the form
fn resolve_amount(values: &FormValues) -> FormValues {
    let mut out = values.clone();
    let custom = out.remove("customAmount");
    let is_custom = out
        .get("amount")
        .is_some_and(|v| v.as_text() == CUSTOM_AMOUNT);
    if is_custom {
        out.insert("amount".to_string(), custom.unwrap_or_default());
    }
    out
}

fn build() -> FormDefinition {
    FormDefinition {
        title: "Donate",
        fields: vec![
            FieldDef::new("name", "Full name", FieldKind::Text),
            FieldDef::new("email", "Email", FieldKind::Text),
            FieldDef::new("phone", "Phone", FieldKind::Text),
            FieldDef::new("amount", "Amount", FieldKind::Amount(PRESET_AMOUNTS)),
            FieldDef::new("customAmount", "Custom amount", FieldKind::Text),
            FieldDef::new("receipt", "Payment receipt (image path)", FieldKind::File),
            FieldDef::new("message", "Message (optional)", FieldKind::Multiline),
        ],
        steps: vec![
            StepDefinition::new(
                "Donor details",
                &["name", "email", "phone", "amount", "customAmount"],
            ),
            StepDefinition::new("Payment receipt", &["receipt"]),
            StepDefinition::new("Review", &["message"]),
        ],
        rules: RuleTable::new()
            .with("name", name_rule())
            .with("email", email_rule())
            .with("phone", phone_rule())
            .with(
                "amount",
                FieldRule::required("Please select or enter a donation amount").predicate(
                    amount_is_valid,
                    "Please enter a custom amount greater than zero",
                ),
            )
            .with(
                "receipt",
                FieldRule::required("Please upload your payment receipt").predicate(
                    receipt_is_image,
                    "Receipt must be an image (jpg, png or webp)",
                ),
            ),
        create_endpoint: Endpoint::post("donation/create"),
        update_endpoint: None,
        prepare_payload: Some(resolve_amount),
        success_message: "Thank you! Your donation has been recorded.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::form_state::FormState;

    #[test]
    fn test_three_steps() {
        let def = definition();
        let labels: Vec<_> = def.steps.iter().map(|s| s.label).collect();
        assert_eq!(labels, ["Donor details", "Payment receipt", "Review"]);
    }

    #[test]
    fn test_custom_amount_requires_value() {
        let mut state = FormState::new(definition());
        state.set_value("amount", FieldValue::text(CUSTOM_AMOUNT));
        assert!(!state.validate_field("amount"));
        assert_eq!(
            state.error("amount"),
            "Please enter a custom amount greater than zero"
        );

        state.set_value("customAmount", FieldValue::text("250"));
        assert!(state.validate_field("amount"));
    }

    #[test]
    fn test_zero_preset_rejected() {
        let mut state = FormState::new(definition());
        state.set_value("amount", FieldValue::text("0"));
        assert!(!state.validate_field("amount"));
    }

    #[test]
    fn test_receipt_must_be_image() {
        let mut state = FormState::new(definition());
        state.set_value("receipt", FieldValue::file("/tmp/receipt.pdf"));
        assert!(!state.validate_field("receipt"));
        state.set_value("receipt", FieldValue::file("/tmp/receipt.webp"));
        assert!(state.validate_field("receipt"));
    }

    #[test]
    fn test_resolve_amount_uses_custom_value() {
        let mut values = definition().empty_values();
        values.insert("amount".into(), FieldValue::text(CUSTOM_AMOUNT));
        values.insert("customAmount".into(), FieldValue::text("750"));

        let out = resolve_amount(&values);
        assert_eq!(out.get("amount"), Some(&FieldValue::text("750")));
        assert!(!out.contains_key("customAmount"));
    }

    #[test]
    fn test_resolve_amount_keeps_preset() {
        let mut values = definition().empty_values();
        values.insert("amount".into(), FieldValue::text("1000"));

        let out = resolve_amount(&values);
        assert_eq!(out.get("amount"), Some(&FieldValue::text("1000")));
    }
}
