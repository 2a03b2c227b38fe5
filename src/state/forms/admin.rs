//! Single-step admin forms for the back-office collections, and the
//! public contact form

use super::controller::FormMode;
use super::definition::{FormDefinition, StepDefinition};
use super::field::{FieldDef, FieldKind, FieldValue};
use super::rules::{
    email_rule, has_extension, name_rule, FieldRule, FormValues, RuleTable, IMAGE_EXTENSIONS,
};
use crate::api::Endpoint;
use chrono::NaiveDate;
use std::sync::{Arc, LazyLock};

/// Back-office collections that can be created and edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminForm {
    Blog,
    News,
    Event,
    Gallery,
    Team,
}

impl AdminForm {
    pub const ALL: [AdminForm; 5] = [
        Self::Blog,
        Self::News,
        Self::Event,
        Self::Gallery,
        Self::Team,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn resource(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::News => "news",
            Self::Event => "event",
            Self::Gallery => "gallery",
            Self::Team => "team",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Blog => "Blog post",
            Self::News => "News item",
            Self::Event => "Event",
            Self::Gallery => "Gallery image",
            Self::Team => "Team member",
        }
    }

    fn success_message(&self, mode: FormMode) -> &'static str {
        match (self, mode) {
            (Self::Blog, FormMode::Create) => "Blog post created.",
            (Self::Blog, FormMode::Edit) => "Blog post updated.",
            (Self::News, FormMode::Create) => "News item created.",
            (Self::News, FormMode::Edit) => "News item updated.",
            (Self::Event, FormMode::Create) => "Event created.",
            (Self::Event, FormMode::Edit) => "Event updated.",
            (Self::Gallery, FormMode::Create) => "Image added to the gallery.",
            (Self::Gallery, FormMode::Edit) => "Gallery image updated.",
            (Self::Team, FormMode::Create) => "Team member added.",
            (Self::Team, FormMode::Edit) => "Team member updated.",
        }
    }

    fn fields(&self) -> Vec<FieldDef> {
        let image = FieldDef::new("image", "Image (file path)", FieldKind::File);
        match self {
            Self::Blog => vec![
                FieldDef::new("title", "Title", FieldKind::Text),
                FieldDef::new("author", "Author", FieldKind::Text),
                FieldDef::new("content", "Content", FieldKind::Multiline),
                image,
            ],
            Self::News => vec![
                FieldDef::new("title", "Title", FieldKind::Text),
                FieldDef::new("content", "Content", FieldKind::Multiline),
                image,
            ],
            Self::Event => vec![
                FieldDef::new("title", "Title", FieldKind::Text),
                FieldDef::new("description", "Description", FieldKind::Multiline),
                FieldDef::new("date", "Date (YYYY-MM-DD)", FieldKind::Text),
                FieldDef::new("location", "Location", FieldKind::Text),
                image,
            ],
            Self::Gallery => vec![FieldDef::new("title", "Caption", FieldKind::Text), image],
            Self::Team => vec![
                FieldDef::new("name", "Name", FieldKind::Text),
                FieldDef::new("role", "Role", FieldKind::Text),
                FieldDef::new("bio", "Bio", FieldKind::Multiline),
                image,
            ],
        }
    }
}

static CREATE: LazyLock<[Arc<FormDefinition>; 5]> = LazyLock::new(|| build_all(FormMode::Create));

static EDIT: LazyLock<[Arc<FormDefinition>; 5]> = LazyLock::new(|| build_all(FormMode::Edit));

static CONTACT: LazyLock<Arc<FormDefinition>> = LazyLock::new(|| Arc::new(build_contact()));

/// Definition used when creating a new record
pub fn create_definition(form: AdminForm) -> Arc<FormDefinition> {
    CREATE[form.index()].clone()
}

/// Definition used when editing; the image becomes optional
pub fn edit_definition(form: AdminForm) -> Arc<FormDefinition> {
    EDIT[form.index()].clone()
}

pub fn contact_definition() -> Arc<FormDefinition> {
    CONTACT.clone()
}

fn image_allowed(value: &FieldValue, _: &FormValues) -> bool {
    has_extension(value, IMAGE_EXTENSIONS)
}

fn valid_date(value: &FieldValue, _: &FormValues) -> bool {
    NaiveDate::parse_from_str(value.as_text().trim(), "%Y-%m-%d").is_ok()
}

const IMAGE_TYPE_MESSAGE: &str = "Image must be a jpg, png or webp file";

fn build_all(mode: FormMode) -> [Arc<FormDefinition>; 5] {
    AdminForm::ALL.map(|form| Arc::new(build(form, mode)))
}

fn build(form: AdminForm, mode: FormMode) -> FormDefinition {
    let fields = form.fields();
    let owned: Vec<&'static str> = fields.iter().map(|f| f.name).collect();

    let image_rule = match mode {
        FormMode::Create => FieldRule::required("Please choose an image"),
        FormMode::Edit => FieldRule::optional("Please choose an image"),
    }
    .predicate(image_allowed, IMAGE_TYPE_MESSAGE);

    let mut rules = RuleTable::new().with("image", image_rule);
    for field in &fields {
        rules = match field.name {
            "image" => rules,
            "title" => rules.with("title", FieldRule::required("Please enter a title")),
            "name" => rules.with("name", name_rule()),
            "date" => rules.with(
                "date",
                FieldRule::required("Please enter a date")
                    .predicate(valid_date, "Date must be in YYYY-MM-DD format"),
            ),
            name => {
                let message = format!("Please enter the {}", field.label.to_lowercase());
                rules.with(name, FieldRule::required(message))
            }
        };
    }

    FormDefinition {
        title: form.title(),
        fields,
        steps: vec![StepDefinition {
            label: form.title(),
            owned_fields: owned,
        }],
        rules,
        create_endpoint: Endpoint::create(form.resource()),
        update_endpoint: match mode {
            FormMode::Create => None,
            FormMode::Edit => Some(Endpoint::update(form.resource())),
        },
        prepare_payload: None,
        success_message: form.success_message(mode),
    }
}

fn build_contact() -> FormDefinition {
    FormDefinition {
        title: "Contact us",
        fields: vec![
            FieldDef::new("name", "Name", FieldKind::Text),
            FieldDef::new("email", "Email", FieldKind::Text),
            FieldDef::new("subject", "Subject", FieldKind::Text),
            FieldDef::new("message", "Message", FieldKind::Multiline),
        ],
        steps: vec![StepDefinition::new(
            "Your message",
            &["name", "email", "subject", "message"],
        )],
        rules: RuleTable::new()
            .with("name", name_rule())
            .with("email", email_rule())
            .with("subject", FieldRule::required("Please enter a subject"))
            .with("message", FieldRule::required("Please enter a message")),
        create_endpoint: Endpoint::create("contact"),
        update_endpoint: None,
        prepare_payload: None,
        success_message: "Thanks for reaching out! We'll get back to you soon.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Payload;
    use crate::state::forms::form_state::FormState;
    use crate::state::forms::step::can_submit;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_step_owns_every_field() {
        for form in AdminForm::ALL {
            let def = create_definition(form);
            assert_eq!(def.step_count(), 1);
            let owned = &def.steps[0].owned_fields;
            assert_eq!(owned.len(), def.fields.len(), "{form:?}");
        }
    }

    #[test]
    fn test_image_required_only_on_create() {
        let mut create = FormState::new(create_definition(AdminForm::Gallery));
        create.set_value("title", FieldValue::text("Picnic"));
        assert!(!can_submit(&mut create));
        assert_eq!(create.error("image"), "Please choose an image");

        let mut edit = FormState::new(edit_definition(AdminForm::Gallery));
        edit.set_value("title", FieldValue::text("Picnic"));
        assert!(can_submit(&mut edit));
    }

    #[test]
    fn test_image_type_checked_when_present() {
        let mut edit = FormState::new(edit_definition(AdminForm::Team));
        edit.set_value("image", FieldValue::file("/tmp/cv.pdf"));
        assert!(!edit.validate_field("image"));
        assert_eq!(edit.error("image"), IMAGE_TYPE_MESSAGE);
    }

    #[test]
    fn test_event_date_format() {
        let mut state = FormState::new(create_definition(AdminForm::Event));
        state.set_value("date", FieldValue::text("next friday"));
        assert!(!state.validate_field("date"));
        state.set_value("date", FieldValue::text("2026-05-01"));
        assert!(state.validate_field("date"));
    }

    #[test]
    fn test_generic_required_message_uses_label() {
        let mut state = FormState::new(create_definition(AdminForm::Team));
        state.validate_field("role");
        assert_eq!(state.error("role"), "Please enter the role");
    }

    #[test]
    fn test_endpoints_per_mode() {
        assert_eq!(create_definition(AdminForm::Blog).update_endpoint, None);
        assert_eq!(
            edit_definition(AdminForm::Blog).update_endpoint,
            Some(Endpoint::update("blog"))
        );
        assert_eq!(
            create_definition(AdminForm::Event).create_endpoint,
            Endpoint::create("event")
        );
    }

    #[test]
    fn test_contact_form_is_json() {
        let mut state = FormState::new(contact_definition());
        state.set_value("name", FieldValue::text("Sam"));
        state.set_value("email", FieldValue::text("sam@example.org"));
        state.set_value("subject", FieldValue::text("Hello"));
        state.set_value("message", FieldValue::text("How can I help?"));
        assert!(can_submit(&mut state));

        let payload = Payload::from_values(&state.values, None);
        assert!(!payload.is_multipart());
        assert_eq!(payload.text("subject"), Some("Hello"));
    }
}
