//! Route table for the dashboard form actions

use super::handlers::{
    AppState, create_invoice, delete_invoice, list_invoices, login, update_invoice,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build the dashboard routes
///
/// All invoice routes hang off the configured listing path:
/// - GET {listing} - Listing view (cached)
/// - POST {listing}/create - Create invoice
/// - POST {listing}/{id}/edit - Update invoice
/// - POST {listing}/{id}/delete - Delete invoice
/// - POST /login - Sign in
pub fn build_routes(state: AppState) -> Router {
    let listing = state.invoices.listing_path().to_string();

    Router::new()
        .route(&listing, get(list_invoices))
        .route(&format!("{}/create", listing), post(create_invoice))
        .route(&format!("{}/{{id}}/edit", listing), post(update_invoice))
        .route(&format!("{}/{{id}}/delete", listing), post(delete_invoice))
        .route("/login", post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
