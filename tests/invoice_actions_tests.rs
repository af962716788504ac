//! Integration tests for the invoice form actions
//!
//! The store and the revalidator are replaced by recording doubles so each
//! test can assert exactly which statements were issued.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use invoice_actions::actions::invoices::{
    CREATE_INVALID_MESSAGE, DELETED_MESSAGE, InvoiceActions, UPDATE_INVALID_MESSAGE,
};
use invoice_actions::core::invoice::today_utc;
use invoice_actions::prelude::*;
use invoice_actions::storage::InMemoryStore;
use std::sync::Mutex;

const LISTING: &str = "/dashboard/invoices";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Insert(NewInvoice),
    Update(String, InvoiceChanges),
    Delete(String),
}

/// Store double recording every statement; optionally fails all of them
#[derive(Default)]
struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    failure: Option<String>,
}

impl RecordingStore {
    fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl InvoiceStore for RecordingStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<()> {
        self.record(Call::Insert(invoice))
    }

    async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64> {
        self.record(Call::Update(id.to_string(), changes))?;
        Ok(0)
    }

    async fn delete(&self, id: &str) -> Result<u64> {
        self.record(Call::Delete(id.to_string()))?;
        Ok(0)
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct RecordingRevalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl PathRevalidator for RecordingRevalidator {
    async fn revalidate_path(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

fn setup(store: RecordingStore) -> (InvoiceActions, Arc<RecordingStore>, Arc<RecordingRevalidator>) {
    let store = Arc::new(store);
    let cache = Arc::new(RecordingRevalidator::default());
    let actions = InvoiceActions::new(store.clone(), cache.clone(), LISTING);
    (actions, store, cache)
}

fn invoice_form(customer_id: &str, amount: &str, status: &str) -> FormData {
    FormData::new()
        .with("customerId", customer_id)
        .with("amount", amount)
        .with("status", status)
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_valid_invoice_inserts_and_redirects() {
    let (actions, store, cache) = setup(RecordingStore::default());

    let outcome = actions
        .create_invoice(FormState::default(), &invoice_form("c1", "10", "pending"))
        .await;

    assert_eq!(outcome, ActionOutcome::Redirect(LISTING.to_string()));
    assert_eq!(
        store.calls(),
        vec![Call::Insert(NewInvoice {
            customer_id: "c1".to_string(),
            amount: 1000,
            status: InvoiceStatus::Pending,
            date: today_utc(),
        })]
    );
    assert_eq!(cache.paths(), vec![LISTING.to_string()]);
}

#[tokio::test]
async fn test_create_converts_fractional_amount_to_cents() {
    let (actions, store, _) = setup(RecordingStore::default());

    actions
        .create_invoice(FormState::default(), &invoice_form("c1", "12.50", "paid"))
        .await;

    match store.calls().as_slice() {
        [Call::Insert(invoice)] => {
            assert_eq!(invoice.amount, 1250);
            assert_eq!(invoice.status, InvoiceStatus::Paid);
        }
        other => panic!("expected one insert, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_with_invalid_fields_issues_no_statement() {
    let (actions, store, cache) = setup(RecordingStore::default());
    let form = FormData::new().with("amount", "0").with("status", "overdue");

    let outcome = actions.create_invoice(FormState::default(), &form).await;
    let state = outcome.into_state().expect("validation failure returns a state");

    assert_eq!(state.message.as_deref(), Some(CREATE_INVALID_MESSAGE));
    let errors = state.errors.expect("field errors are reported");
    assert_eq!(
        errors.get("customerId"),
        Some(&["please select a customer.".to_string()][..])
    );
    assert_eq!(
        errors.get("amount"),
        Some(&["please enter a number greater than $0.".to_string()][..])
    );
    assert_eq!(
        errors.get("status"),
        Some(&["please select a status.".to_string()][..])
    );

    assert!(store.calls().is_empty());
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn test_create_rejects_non_positive_amounts() {
    for amount in ["0", "-5", "", "abc"] {
        let (actions, store, _) = setup(RecordingStore::default());

        let outcome = actions
            .create_invoice(FormState::default(), &invoice_form("c1", amount, "paid"))
            .await;

        let state = outcome.into_state().unwrap();
        let errors = state.errors.unwrap();
        assert!(errors.contains("amount"), "amount {:?} should fail", amount);
        assert_eq!(errors.len(), 1);
        assert!(store.calls().is_empty());
    }
}

#[tokio::test]
async fn test_create_rejects_amount_too_large_for_cents() {
    let (actions, store, cache) = setup(RecordingStore::default());

    let outcome = actions
        .create_invoice(FormState::default(), &invoice_form("c1", "1e300", "paid"))
        .await;

    let state = outcome.into_state().expect("oversized amount returns a state");
    assert_eq!(state.message.as_deref(), Some(CREATE_INVALID_MESSAGE));
    assert_eq!(
        state.errors.unwrap().get("amount"),
        Some(&["please enter a number greater than $0.".to_string()][..])
    );
    assert!(store.calls().is_empty());
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn test_create_store_failure_reports_message_without_revalidating() {
    let (actions, store, cache) = setup(RecordingStore::failing("connection refused"));

    let outcome = actions
        .create_invoice(FormState::default(), &invoice_form("c1", "10", "pending"))
        .await;

    let state = outcome.into_state().expect("failure returns a state");
    assert_eq!(
        state.message.as_deref(),
        Some("database error: failed to create invoice. error: connection refused")
    );
    assert!(state.errors.is_none());
    assert_eq!(store.calls().len(), 1);
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn test_create_ignores_previous_state() {
    let (actions, _, _) = setup(RecordingStore::default());
    let previous = FormState::message("stale");

    let outcome = actions
        .create_invoice(previous, &invoice_form("c1", "1", "paid"))
        .await;

    assert!(outcome.is_redirect());
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_issues_one_statement_for_id() {
    let (actions, store, cache) = setup(RecordingStore::default());

    let outcome = actions
        .update_invoice("i1", FormState::default(), &invoice_form("c2", "7.25", "paid"))
        .await;

    // the double reports zero rows touched; still a success
    assert_eq!(outcome.redirect_target(), Some(LISTING));
    assert_eq!(
        store.calls(),
        vec![Call::Update(
            "i1".to_string(),
            InvoiceChanges {
                customer_id: "c2".to_string(),
                amount: 725,
                status: InvoiceStatus::Paid,
            }
        )]
    );
    assert_eq!(cache.paths(), vec![LISTING.to_string()]);
}

#[tokio::test]
async fn test_update_with_invalid_fields() {
    let (actions, store, _) = setup(RecordingStore::default());

    let outcome = actions
        .update_invoice("i1", FormState::default(), &invoice_form("c1", "10", "void"))
        .await;

    let state = outcome.into_state().unwrap();
    assert_eq!(state.message.as_deref(), Some(UPDATE_INVALID_MESSAGE));
    assert!(state.errors.unwrap().contains("status"));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_update_store_failure() {
    let (actions, _, cache) = setup(RecordingStore::failing("invalid input syntax for type uuid"));

    let outcome = actions
        .update_invoice("nope", FormState::default(), &invoice_form("c1", "10", "paid"))
        .await;

    assert_eq!(
        outcome.into_state().unwrap().message.as_deref(),
        Some("database error: failed to update invoice. error: invalid input syntax for type uuid")
    );
    assert!(cache.paths().is_empty());
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_returns_message_without_redirect() {
    let (actions, store, cache) = setup(RecordingStore::default());

    let state = actions.delete_invoice("i1").await;

    assert_eq!(state, FormState::message(DELETED_MESSAGE));
    assert_eq!(store.calls(), vec![Call::Delete("i1".to_string())]);
    assert_eq!(cache.paths(), vec![LISTING.to_string()]);
}

#[tokio::test]
async fn test_delete_twice_reports_same_message() {
    let store = InMemoryStore::new();
    store
        .put_invoice(Invoice {
            id: "i1".to_string(),
            customer_id: "c1".to_string(),
            amount: 500,
            status: InvoiceStatus::Pending,
            date: today_utc(),
        })
        .unwrap();
    let actions = InvoiceActions::new(
        Arc::new(store.clone()),
        Arc::new(PageCache::new()),
        LISTING,
    );

    let first = actions.delete_invoice("i1").await;
    let second = actions.delete_invoice("i1").await;

    assert_eq!(first, second);
    assert_eq!(first.message.as_deref(), Some(DELETED_MESSAGE));
    assert!(store.invoice("i1").unwrap().is_none());
}

#[tokio::test]
async fn test_delete_store_failure() {
    let (actions, _, cache) = setup(RecordingStore::failing("timeout"));

    let state = actions.delete_invoice("i1").await;

    assert_eq!(
        state.message.as_deref(),
        Some("database error: failed to delete invoice. error: timeout")
    );
    assert!(cache.paths().is_empty());
}

// ============================================================================
// Against the in-memory store
// ============================================================================

#[tokio::test]
async fn test_create_then_update_in_memory() {
    let store = InMemoryStore::new();
    let cache = Arc::new(PageCache::new());
    let actions = InvoiceActions::new(Arc::new(store.clone()), cache.clone(), LISTING);

    let outcome = actions
        .create_invoice(FormState::default(), &invoice_form("c1", "10", "pending"))
        .await;
    assert!(outcome.is_redirect());

    let invoices = store.list().await.unwrap();
    assert_eq!(invoices.len(), 1);
    let id = invoices[0].id.clone();

    actions
        .update_invoice(&id, FormState::default(), &invoice_form("c1", "20", "paid"))
        .await;

    let updated = store.invoice(&id).unwrap().unwrap();
    assert_eq!(updated.amount, 2000);
    assert_eq!(updated.status, InvoiceStatus::Paid);
    assert_eq!(updated.date, invoices[0].date);
    assert_eq!(cache.revalidation_count(LISTING).await, 2);
}
