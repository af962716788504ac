//! Sign-in action

use crate::core::auth::{AuthErrorKind, CREDENTIALS_STRATEGY, CredentialVerifier, SignInError};
use crate::core::form::FormData;
use crate::core::state::ActionOutcome;
use std::sync::Arc;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid authentication.";
pub const GENERIC_AUTH_MESSAGE: &str = "an error occurred.";

/// Form action behind the login view
pub struct AuthActions {
    verifier: Arc<dyn CredentialVerifier>,
}

impl AuthActions {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }

    /// Sign in with the `"credentials"` strategy
    ///
    /// An established session redirects to wherever the verifier sends it.
    /// Classified authentication failures come back as a message for the
    /// form; every other failure is returned as `Err` unchanged.
    pub async fn authenticate(
        &self,
        _prev: Option<String>,
        form: &FormData,
    ) -> anyhow::Result<ActionOutcome<String>> {
        match self.verifier.sign_in(CREDENTIALS_STRATEGY, form).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user_id, "signed in");
                Ok(ActionOutcome::Redirect(session.redirect_to))
            }
            Err(SignInError::Auth(e)) => {
                tracing::warn!(kind = %e.kind, "sign-in rejected");
                let message = match e.kind {
                    AuthErrorKind::CredentialsSignin => INVALID_CREDENTIALS_MESSAGE,
                    _ => GENERIC_AUTH_MESSAGE,
                };
                Ok(ActionOutcome::State(message.to_string()))
            }
            Err(SignInError::Other(e)) => {
                tracing::error!(error = %e, "sign-in failed");
                Err(e)
            }
        }
    }
}
