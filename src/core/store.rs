//! Store traits
//!
//! The actions only need one statement per mutation, so the traits stay
//! narrow. Implementations report failures as errors and never retry.

use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Persistence for invoices
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new invoice; the store assigns the id
    async fn insert(&self, invoice: NewInvoice) -> Result<()>;

    /// Overwrite customer, amount and status of the invoice with `id`
    ///
    /// Returns the number of rows touched. An unknown id touches zero rows
    /// and is not an error.
    async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64>;

    /// Delete the invoice with `id`, returning the number of rows removed
    async fn delete(&self, id: &str) -> Result<u64>;

    /// All invoices, newest date first
    async fn list(&self) -> Result<Vec<Invoice>>;
}

/// A dashboard account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
}

/// Lookup of accounts for credential verification
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert an account; an existing email is left untouched
    async fn insert_user(&self, user: User) -> Result<()>;
}
