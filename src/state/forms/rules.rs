//! Declarative field rules and the field validator

use super::field::FieldValue;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// Current values of a form, keyed by backend field name
pub type FormValues = BTreeMap<String, FieldValue>;

/// Check for rules a regex cannot express. Receives every form value so
/// rules like "custom amount must be set when chosen" can look sideways.
pub type Predicate = fn(&FieldValue, &FormValues) -> bool;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\s]+$").expect("valid name regex"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid phone regex"));

/// Letters and whitespace only
pub fn name_pattern() -> Regex {
    NAME_PATTERN.clone()
}

pub fn email_pattern() -> Regex {
    EMAIL_PATTERN.clone()
}

/// Exactly ten digits
pub fn phone_pattern() -> Regex {
    PHONE_PATTERN.clone()
}

pub fn name_rule() -> FieldRule {
    FieldRule::required("Please enter your name").pattern(name_pattern())
}

pub fn email_rule() -> FieldRule {
    FieldRule::required("Please enter a valid email address").pattern(email_pattern())
}

pub fn phone_rule() -> FieldRule {
    FieldRule::required("Please enter a valid 10-digit phone number").pattern(phone_pattern())
}

/// True when the attached file has one of the given extensions
pub fn has_extension(value: &FieldValue, allowed: &[&str]) -> bool {
    value
        .as_file()
        .is_some_and(|f| allowed.contains(&f.extension().as_str()))
}

/// Anchored pattern matching exactly one of `options`
pub fn one_of(options: &[&str]) -> Regex {
    let alternatives: Vec<String> = options.iter().copied().map(regex::escape).collect();
    let pattern = format!("^({})$", alternatives.join("|"));
    Regex::new(&pattern).expect("escaped alternation is a valid regex")
}

/// Image types accepted for receipts and admin uploads
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// The single non-required check a rule performs
#[derive(Debug, Clone)]
pub enum RuleCheck {
    None,
    Pattern(Regex),
    Predicate(Predicate),
}

/// Validation contract for one field
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub required: bool,
    pub check: RuleCheck,
    /// Shown when the required or pattern check fails
    pub message: String,
    /// Shown when the predicate fails
    pub invalid_message: Option<String>,
}

impl FieldRule {
    pub fn required(message: impl Into<String>) -> Self {
        Self {
            required: true,
            check: RuleCheck::None,
            message: message.into(),
            invalid_message: None,
        }
    }

    pub fn optional(message: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(message)
        }
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.check = RuleCheck::Pattern(pattern);
        self
    }

    pub fn predicate(mut self, predicate: Predicate, invalid_message: impl Into<String>) -> Self {
        self.check = RuleCheck::Predicate(predicate);
        self.invalid_message = Some(invalid_message.into());
        self
    }

    /// Apply the rule; an empty string means the value is valid
    pub fn apply(&self, value: &FieldValue, values: &FormValues) -> String {
        if value.is_empty() {
            return if self.required {
                self.message.clone()
            } else {
                String::new()
            };
        }

        match &self.check {
            RuleCheck::None => String::new(),
            RuleCheck::Pattern(re) => {
                if re.is_match(value.as_text().trim()) {
                    String::new()
                } else {
                    self.message.clone()
                }
            }
            RuleCheck::Predicate(predicate) => {
                if predicate(value, values) {
                    String::new()
                } else {
                    self.invalid_message
                        .clone()
                        .unwrap_or_else(|| self.message.clone())
                }
            }
        }
    }
}

/// Rule lookup by field name
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<&'static str, FieldRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &'static str, rule: FieldRule) -> Self {
        self.rules.insert(field, rule);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field)
    }

    /// Validate one field. Fields without a rule are always valid.
    pub fn validate(&self, field: &str, value: &FieldValue, values: &FormValues) -> String {
        match self.get(field) {
            Some(rule) => rule.apply(value, values),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::FileHandle;

    fn no_values() -> FormValues {
        FormValues::new()
    }

    fn table() -> RuleTable {
        RuleTable::new()
            .with(
                "email",
                FieldRule::required("Please enter a valid email").pattern(email_pattern()),
            )
            .with(
                "receipt",
                FieldRule::required("Receipt is required").predicate(
                    |v, _| v.as_file().is_some_and(|f| f.extension() == "png"),
                    "Receipt must be an image",
                ),
            )
            .with(
                "nickname",
                FieldRule::optional("bad").pattern(name_pattern()),
            )
    }

    fn check_text(field: &str, text: &str) -> String {
        table().validate(field, &FieldValue::text(text), &no_values())
    }

    #[test]
    fn test_unknown_field_is_valid() {
        assert_eq!(check_text("whatever", ""), "");
    }

    #[test]
    fn test_required_blank_returns_message() {
        let msg = table().validate("email", &FieldValue::text("  "), &no_values());
        assert_eq!(msg, "Please enter a valid email");
    }

    #[test]
    fn test_pattern_failure_returns_message() {
        let msg = table().validate("email", &FieldValue::text("not-an-email"), &no_values());
        assert_eq!(msg, "Please enter a valid email");
    }

    #[test]
    fn test_valid_value_returns_empty() {
        let msg = table().validate("email", &FieldValue::text("amy@example.org"), &no_values());
        assert_eq!(msg, "");
    }

    #[test]
    fn test_predicate_failure_uses_invalid_message() {
        let value = FieldValue::File(Some(FileHandle::from_path("/tmp/receipt.txt")));
        assert_eq!(
            table().validate("receipt", &value, &no_values()),
            "Receipt must be an image"
        );
    }

    #[test]
    fn test_optional_empty_skips_pattern() {
        assert_eq!(check_text("nickname", ""), "");
        assert_eq!(check_text("nickname", "4x"), "bad");
    }

    #[test]
    fn test_one_of_matches_whole_option() {
        let pattern = one_of(&["weekdays", "weekends"]);
        assert!(pattern.is_match("weekends"));
        assert!(!pattern.is_match("weekend"));
        assert!(!pattern.is_match("weekdays or weekends"));
    }

    #[test]
    fn test_phone_pattern_needs_ten_digits() {
        assert!(phone_pattern().is_match("0123456789"));
        assert!(!phone_pattern().is_match("012345678"));
    }

    #[test]
    fn test_name_pattern_accepts_unicode_letters() {
        assert!(name_pattern().is_match("Zoë Åkesson"));
        assert!(!name_pattern().is_match("R2D2"));
    }
}
