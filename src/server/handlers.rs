//! HTTP handlers
//!
//! Thin adapters between axum and the form actions. Submissions arrive as
//! urlencoded forms; the previous form state is not round-tripped over HTTP,
//! so every submission starts from an empty state.

use crate::actions::{AuthActions, InvoiceActions};
use crate::core::cache::PageCache;
use crate::core::error::AppError;
use crate::core::form::FormData;
use crate::core::state::{ActionOutcome, FormState};
use crate::core::store::InvoiceStore;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;

/// Shared state of the HTTP surface
#[derive(Clone)]
pub struct AppState {
    pub invoices: Arc<InvoiceActions>,
    pub auth: Arc<AuthActions>,
    pub store: Arc<dyn InvoiceStore>,
    pub cache: Arc<PageCache>,
}

/// Listing view, served from the page cache until a mutation revalidates it
pub async fn list_invoices(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.store.clone();
    let body = state
        .cache
        .get_or_render(state.invoices.listing_path(), || async move {
            let invoices = store.list().await?;
            let body = json!({
                "invoices": invoices,
                "count": invoices.len()
            });
            Ok::<_, anyhow::Error>(body.to_string())
        })
        .await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

pub async fn create_invoice(State(state): State<AppState>, form: FormData) -> ActionOutcome {
    state
        .invoices
        .create_invoice(FormState::default(), &form)
        .await
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: FormData,
) -> ActionOutcome {
    state
        .invoices
        .update_invoice(&id, FormState::default(), &form)
        .await
}

pub async fn delete_invoice(State(state): State<AppState>, Path(id): Path<String>) -> ActionOutcome {
    ActionOutcome::State(state.invoices.delete_invoice(&id).await)
}

/// Login form; unclassified sign-in failures surface as error responses
pub async fn login(State(state): State<AppState>, form: FormData) -> Result<ActionOutcome, AppError> {
    let outcome = state.auth.authenticate(None, &form).await?;

    Ok(match outcome {
        ActionOutcome::Redirect(to) => ActionOutcome::Redirect(to),
        ActionOutcome::State(message) => ActionOutcome::State(FormState::message(message)),
    })
}
