//! In-memory implementation of the invoice and user stores for testing and development

use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use crate::core::store::{InvoiceStore, User, UserStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    invoices: Arc<RwLock<HashMap<String, Invoice>>>,
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an invoice with a known id
    pub fn put_invoice(&self, invoice: Invoice) -> Result<()> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        invoices.insert(invoice.id.clone(), invoice);

        Ok(())
    }

    /// Look an invoice up by id
    pub fn invoice(&self, id: &str) -> Result<Option<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(invoices.get(id).cloned())
    }
}

#[async_trait]
impl InvoiceStore for InMemoryStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<()> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = Uuid::new_v4().to_string();
        invoices.insert(
            id.clone(),
            Invoice {
                id,
                customer_id: invoice.customer_id,
                amount: invoice.amount,
                status: invoice.status,
                date: invoice.date,
            },
        );

        Ok(())
    }

    async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(invoice) = invoices.get_mut(id) else {
            return Ok(0);
        };

        invoice.customer_id = changes.customer_id;
        invoice.amount = changes.amount;
        invoice.status = changes.status;

        Ok(1)
    }

    async fn delete(&self, id: &str) -> Result<u64> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(invoices.remove(id).map_or(0, |_| 1))
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut all: Vec<Invoice> = invoices.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        Ok(all)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(users.get(email).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        users.entry(user.email.clone()).or_insert(user);

        Ok(())
    }
}
