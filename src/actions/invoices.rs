//! Invoice form actions
//!
//! Each action is a stateless reducer over `(previous state, submission)`:
//! validate, attempt exactly one statement, report. Store failures are folded
//! into the returned [`FormState`] and never retried.

use crate::core::cache::PathRevalidator;
use crate::core::form::FormData;
use crate::core::invoice::{InvoiceChanges, NewInvoice, amount_in_cents, today_utc};
use crate::core::state::{ActionOutcome, FormState};
use crate::core::store::InvoiceStore;
use crate::core::validation::InvoiceInput;
use std::sync::Arc;

pub const CREATE_INVALID_MESSAGE: &str = "missing fields. unable to create invoice.";
pub const UPDATE_INVALID_MESSAGE: &str = "missing fields. unable to update invoice.";
pub const DELETED_MESSAGE: &str = "invoice deleted";

fn database_error(operation: &str, err: &anyhow::Error) -> String {
    format!(
        "database error: failed to {} invoice. error: {:#}",
        operation, err
    )
}

/// Create, update and delete actions for invoices
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    cache: Arc<dyn PathRevalidator>,
    listing_path: String,
}

impl InvoiceActions {
    /// `listing_path` is both the cache region invalidated after a mutation
    /// and the view a successful create/update navigates to
    pub fn new(
        store: Arc<dyn InvoiceStore>,
        cache: Arc<dyn PathRevalidator>,
        listing_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cache,
            listing_path: listing_path.into(),
        }
    }

    pub fn listing_path(&self) -> &str {
        &self.listing_path
    }

    /// Validate a new invoice and insert it, dated today (UTC)
    ///
    /// Redirects to the listing view on success.
    pub async fn create_invoice(&self, _prev: FormState, form: &FormData) -> ActionOutcome {
        let input = match InvoiceInput::safe_parse(form) {
            Ok(input) => input,
            Err(e) => {
                tracing::debug!(error = %e, "create invoice rejected");
                return ActionOutcome::State(FormState::invalid(
                    e.into_field_errors(),
                    CREATE_INVALID_MESSAGE,
                ));
            }
        };

        let invoice = NewInvoice {
            customer_id: input.customer_id,
            amount: amount_in_cents(input.amount),
            status: input.status,
            date: today_utc(),
        };
        let (customer_id, cents) = (invoice.customer_id.clone(), invoice.amount);

        if let Err(e) = self.store.insert(invoice).await {
            tracing::warn!(error = %e, customer_id = %customer_id, "failed to create invoice");
            return ActionOutcome::State(FormState::message(database_error("create", &e)));
        }

        tracing::info!(customer_id = %customer_id, amount = cents, "invoice created");
        self.finish_mutation().await
    }

    /// Validate the edit form and overwrite the invoice with `id`
    ///
    /// No existence check is made: an unknown id updates nothing and still
    /// counts as success.
    pub async fn update_invoice(
        &self,
        id: &str,
        _prev: FormState,
        form: &FormData,
    ) -> ActionOutcome {
        let input = match InvoiceInput::safe_parse(form) {
            Ok(input) => input,
            Err(e) => {
                tracing::debug!(error = %e, invoice_id = id, "update invoice rejected");
                return ActionOutcome::State(FormState::invalid(
                    e.into_field_errors(),
                    UPDATE_INVALID_MESSAGE,
                ));
            }
        };

        let changes = InvoiceChanges {
            customer_id: input.customer_id,
            amount: amount_in_cents(input.amount),
            status: input.status,
        };

        match self.store.update(id, changes).await {
            Ok(rows) => {
                tracing::info!(invoice_id = id, rows, "invoice updated");
            }
            Err(e) => {
                tracing::warn!(error = %e, invoice_id = id, "failed to update invoice");
                return ActionOutcome::State(FormState::message(database_error("update", &e)));
            }
        }

        self.finish_mutation().await
    }

    /// Delete the invoice with `id`
    ///
    /// Returns a confirmation state instead of navigating. Deleting an id
    /// that no longer exists succeeds with the same message.
    pub async fn delete_invoice(&self, id: &str) -> FormState {
        match self.store.delete(id).await {
            Ok(rows) => {
                tracing::info!(invoice_id = id, rows, "invoice deleted");
                self.cache.revalidate_path(&self.listing_path).await;
                FormState::message(DELETED_MESSAGE)
            }
            Err(e) => {
                tracing::warn!(error = %e, invoice_id = id, "failed to delete invoice");
                FormState::message(database_error("delete", &e))
            }
        }
    }

    async fn finish_mutation(&self) -> ActionOutcome {
        self.cache.revalidate_path(&self.listing_path).await;
        ActionOutcome::redirect(self.listing_path.clone())
    }
}
