//! Form validation
//!
//! Field-level coercion lives in [`validators`]; [`schema`] combines those
//! validators into the invoice form shapes and reports every failing field.

pub mod schema;
pub mod validators;

pub use schema::{InvoiceForm, InvoiceInput, ValidationResult};
