//! Form domain layer
//!
//! Field values, validation rules, the per-form state store and the step
//! controller shared by every wizard and admin form.

pub mod admin;
mod controller;
mod definition;
pub mod donation;
mod field;
mod form_state;
mod rules;
mod sanitize;
mod step;
pub mod volunteer;

pub use admin::AdminForm;
pub use controller::{Completion, FormController, FormMode, CUSTOM_AMOUNT_LABEL};
pub use field::{FieldDef, FieldKind, FieldValue, FileHandle, CUSTOM_AMOUNT};
pub use rules::FormValues;
