//! Form actions invoked by the dashboard views
//!
//! - [`InvoiceActions`]: create, update and delete invoices
//! - [`AuthActions`]: sign in with email and password

pub mod auth;
pub mod invoices;

pub use auth::AuthActions;
pub use invoices::InvoiceActions;
