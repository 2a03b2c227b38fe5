//! Input sanitisation applied before values reach the form state.
//!
//! Sanitisation only reshapes raw input; deciding whether the result is
//! acceptable stays with the rule table.

use super::field::{FieldValue, CUSTOM_AMOUNT};

/// Upper bound for the `age` field
pub const MAX_AGE: u32 = 100;

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn letters_and_spaces(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect()
}

fn clamp_age(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return digits;
    }
    // Digit runs too long for u32 are certainly above the cap
    match digits.parse::<u32>() {
        Ok(age) if age <= MAX_AGE => digits,
        _ => MAX_AGE.to_string(),
    }
}

/// Sanitise a raw value for the named field. Non-text values and fields
/// without a sanitiser pass through untouched.
pub fn sanitize(field: &str, value: FieldValue) -> FieldValue {
    let FieldValue::Text(raw) = value else {
        return value;
    };

    let cleaned = match field {
        "name" => letters_and_spaces(&raw),
        "phone" => digits_only(&raw),
        "age" => clamp_age(&raw),
        "amount" if raw == CUSTOM_AMOUNT => raw,
        "amount" | "customAmount" => digits_only(&raw),
        _ => raw,
    };
    FieldValue::Text(cleaned)
}
