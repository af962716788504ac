//! Core types and traits: form input, validation, results and collaborators

pub mod auth;
pub mod cache;
pub mod error;
pub mod form;
pub mod invoice;
pub mod state;
pub mod store;
pub mod validation;

pub use auth::{AuthError, AuthErrorKind, CredentialVerifier, CredentialsProvider, Session, SignInError};
pub use cache::{PageCache, PathRevalidator};
pub use error::{AppError, ConfigError, StorageError, ValidationError};
pub use form::FormData;
pub use invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
pub use state::{ActionOutcome, FieldErrors, FormState};
pub use store::{InvoiceStore, User, UserStore};
