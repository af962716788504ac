//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::build_routes;
use crate::actions::{AuthActions, InvoiceActions};
use crate::config::AppConfig;
use crate::core::auth::{CredentialVerifier, CredentialsProvider};
use crate::core::cache::PageCache;
use crate::core::store::{InvoiceStore, UserStore};
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the dashboard HTTP server
///
/// # Example
///
/// ```ignore
/// let store = InMemoryStore::new();
/// ServerBuilder::new()
///     .with_config(config)
///     .with_store(store)
///     .serve().await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    invoices: Option<Arc<dyn InvoiceStore>>,
    users: Option<Arc<dyn UserStore>>,
    verifier: Option<Arc<dyn CredentialVerifier>>,
    cache: Option<Arc<PageCache>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            invoices: None,
            users: None,
            verifier: None,
            cache: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Use one backend for both invoices and users
    pub fn with_store<S>(self, store: S) -> Self
    where
        S: InvoiceStore + UserStore + 'static,
    {
        let store = Arc::new(store);
        self.with_invoice_store(store.clone()).with_users(store)
    }

    pub fn with_invoice_store(mut self, store: Arc<dyn InvoiceStore>) -> Self {
        self.invoices = Some(store);
        self
    }

    /// User store backing the default credentials provider
    pub fn with_users(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    /// Replace the credentials provider entirely
    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Share a page cache with the caller, e.g. to inspect revalidations
    pub fn with_cache(mut self, cache: Arc<PageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Add custom routes to the server
    ///
    /// They are merged after the dashboard routes and don't get the
    /// dashboard state.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Wire the actions to their collaborators
    pub fn build_state(&self) -> Result<AppState> {
        let store = self
            .invoices
            .clone()
            .ok_or_else(|| anyhow!("Invoice store is required"))?;

        let verifier: Arc<dyn CredentialVerifier> = match (&self.verifier, &self.users) {
            (Some(verifier), _) => verifier.clone(),
            (None, Some(users)) => Arc::new(CredentialsProvider::new(
                users.clone(),
                self.config.routes.after_sign_in.clone(),
            )),
            (None, None) => {
                return Err(anyhow!("A user store or credential verifier is required"));
            }
        };

        let cache = self.cache.clone().unwrap_or_default();
        let invoices = InvoiceActions::new(
            store.clone(),
            cache.clone(),
            self.config.routes.invoices.clone(),
        );

        Ok(AppState {
            invoices: Arc::new(invoices),
            auth: Arc::new(AuthActions::new(verifier)),
            store,
            cache,
        })
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let state = self.build_state()?;
        let mut app = build_routes(state);

        for routes in self.custom_routes {
            app = app.merge(routes);
        }

        Ok(app)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.host:server.port` from the config and stops on
    /// SIGTERM or SIGINT (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
