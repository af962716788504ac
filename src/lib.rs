//! # Invoice Actions
//!
//! Server-side form actions for an invoicing dashboard.
//!
//! ## Features
//!
//! - **Invoice Mutations**: Create, update and delete invoices from form submissions
//! - **Field Validation**: Per-field error messages returned to the form
//! - **Cache Revalidation**: The listing view is re-rendered after every mutation
//! - **Credentials Sign-in**: Email/password authentication with argon2 hashes
//! - **Pluggable Storage**: In-memory store by default, PostgreSQL behind the `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_actions::prelude::*;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let cache = Arc::new(PageCache::new());
//! let actions = InvoiceActions::new(store, cache, "/dashboard/invoices");
//!
//! let form = FormData::new()
//!     .with("customerId", "c1")
//!     .with("amount", "10")
//!     .with("status", "paid");
//!
//! match actions.create_invoice(FormState::default(), &form).await {
//!     ActionOutcome::Redirect(to) => println!("go to {to}"),
//!     ActionOutcome::State(state) => println!("{:?}", state.message),
//! }
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Actions ===
    pub use crate::actions::{AuthActions, InvoiceActions};

    // === Core ===
    pub use crate::core::{
        ActionOutcome, AppError, AuthError, AuthErrorKind, CredentialVerifier,
        CredentialsProvider, FieldErrors, FormData, FormState, Invoice, InvoiceChanges,
        InvoiceStatus, InvoiceStore, NewInvoice, PageCache, PathRevalidator, Session,
        SignInError, User, UserStore,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
