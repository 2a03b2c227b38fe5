//! Volunteer signup wizard

use super::definition::{FormDefinition, StepDefinition};
use super::field::{FieldDef, FieldKind, FieldValue};
use super::rules::{
    email_rule, has_extension, name_rule, one_of, phone_rule, FieldRule, FormValues, RuleTable,
};
use crate::api::Endpoint;
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// Youngest age accepted for volunteers
pub const MIN_AGE: u32 = 16;

pub const GENDERS: &[&str] = &["male", "female", "other"];
pub const AVAILABILITY: &[&str] = &["weekdays", "weekends", "flexible"];
pub const SKILLS: &[&str] = &[
    "Counselling",
    "Event support",
    "Fundraising",
    "Social media",
    "Teaching",
    "Photography",
];

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

static DEFINITION: LazyLock<Arc<FormDefinition>> = LazyLock::new(|| Arc::new(build()));

static GENDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| one_of(GENDERS));

static AVAILABILITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| one_of(AVAILABILITY));

pub fn definition() -> Arc<FormDefinition> {
    DEFINITION.clone()
}

fn old_enough(value: &FieldValue, _: &FormValues) -> bool {
    value
        .as_text()
        .parse::<u32>()
        .is_ok_and(|age| age >= MIN_AGE)
}

/// `YYYY-MM-DD`, today or later
fn date_not_in_past(value: &FieldValue, _: &FormValues) -> bool {
    NaiveDate::parse_from_str(value.as_text().trim(), "%Y-%m-%d")
        .is_ok_and(|date| date >= Local::now().date_naive())
}

fn document_type_allowed(value: &FieldValue, _: &FormValues) -> bool {
    has_extension(value, DOCUMENT_EXTENSIONS)
}

fn build() -> FormDefinition {
    FormDefinition {
        title: "Volunteer",
        fields: vec![
            FieldDef::new("name", "Full name", FieldKind::Text),
            FieldDef::new("age", "Age", FieldKind::Text),
            FieldDef::new("gender", "Gender", FieldKind::Choice(GENDERS)),
            FieldDef::new("phone", "Phone", FieldKind::Text),
            FieldDef::new("email", "Email", FieldKind::Text),
            FieldDef::new("skills", "Skills", FieldKind::MultiChoice(SKILLS)),
            FieldDef::new(
                "availability",
                "Availability",
                FieldKind::Choice(AVAILABILITY),
            ),
            FieldDef::new("startDate", "Start date (YYYY-MM-DD)", FieldKind::Text),
            FieldDef::new(
                "document",
                "ID document (pdf or image path)",
                FieldKind::File,
            ),
            FieldDef::new(
                "motivation",
                "Why do you want to help? (optional)",
                FieldKind::Multiline,
            ),
        ],
        steps: vec![
            StepDefinition::new(
                "Personal details",
                &["name", "age", "gender", "phone", "email"],
            ),
            StepDefinition::new(
                "Skills & availability",
                &["skills", "availability", "startDate"],
            ),
            StepDefinition::new("Documents", &["document", "motivation"]),
        ],
        rules: RuleTable::new()
            .with("name", name_rule())
            .with(
                "age",
                FieldRule::required("Please enter your age")
                    .predicate(old_enough, "Volunteers must be at least 16 years old"),
            )
            .with(
                "gender",
                FieldRule::required("Please select your gender").pattern(GENDER_PATTERN.clone()),
            )
            .with("phone", phone_rule())
            .with("email", email_rule())
            .with(
                "skills",
                FieldRule::required("Please select at least one skill"),
            )
            .with(
                "availability",
                FieldRule::required("Please choose your availability")
                    .pattern(AVAILABILITY_PATTERN.clone()),
            )
            .with(
                "startDate",
                FieldRule::required("Please choose a start date").predicate(
                    date_not_in_past,
                    "Start date must be a valid date that is not in the past",
                ),
            )
            .with(
                "document",
                FieldRule::required("Please upload an identity document").predicate(
                    document_type_allowed,
                    "Document must be a pdf, jpg or png file",
                ),
            ),
        create_endpoint: Endpoint::post("volunteer/create"),
        update_endpoint: None,
        prepare_payload: None,
        success_message: "Thanks for signing up! We'll be in touch soon.",
    }
}
