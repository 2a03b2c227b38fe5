//! Form rendering module
//!
//! - `field_renderer`: one field with its inline error
//! - `wizard`: the page around the current step's fields

mod field_renderer;
mod wizard;

pub use wizard::draw_wizard;
