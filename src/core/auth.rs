//! Credential verification
//!
//! Sign-in goes through a [`CredentialVerifier`], selected by strategy name.
//! Failures come in two flavours:
//! - [`AuthError`]: a classified authentication failure carrying an
//!   [`AuthErrorKind`] discriminant, which the sign-in action turns into a
//!   message for the form
//! - anything else, which the action lets propagate
//!
//! [`CredentialsProvider`] is the `"credentials"` strategy: email and password
//! checked against a [`UserStore`] holding argon2 hashes.

use crate::core::form::FormData;
use crate::core::store::UserStore;
use anyhow::{Result, anyhow};
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use validator::Validate;

/// Strategy name of the email/password provider
pub const CREDENTIALS_STRATEGY: &str = "credentials";

/// Subtype of a classified authentication failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthErrorKind {
    /// The submitted credentials were rejected
    CredentialsSignin,
    /// The provider failed while checking the credentials
    CallbackRouteError,
    /// The account is not allowed to sign in
    AccessDenied,
    /// The provider is misconfigured
    Configuration,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::CredentialsSignin => "CredentialsSignin",
            AuthErrorKind::CallbackRouteError => "CallbackRouteError",
            AuthErrorKind::AccessDenied => "AccessDenied",
            AuthErrorKind::Configuration => "Configuration",
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified authentication failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("authentication failed: {kind}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }
}

/// Failure of a sign-in attempt
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    /// Classified; the sign-in action maps it to a form message
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Unclassified; propagates out of the sign-in action
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// An established session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    /// Where the client goes once the session is established
    pub redirect_to: String,
}

/// Verifies credentials and establishes a session
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn sign_in(&self, strategy: &str, form: &FormData) -> Result<Session, SignInError>;
}

#[derive(Debug, Validate)]
struct Credentials {
    #[validate(email)]
    email: String,

    #[validate(length(min = 6))]
    password: String,
}

impl Credentials {
    fn from_form(form: &FormData) -> Option<Self> {
        let credentials = Credentials {
            email: form.get("email")?.to_string(),
            password: form.get("password")?.to_string(),
        };
        credentials.validate().ok()?;
        Some(credentials)
    }
}

/// Email/password sign-in against a user store
pub struct CredentialsProvider {
    users: Arc<dyn UserStore>,
    after_sign_in: String,
}

impl CredentialsProvider {
    /// `after_sign_in` is the default landing path once signed in
    pub fn new(users: Arc<dyn UserStore>, after_sign_in: impl Into<String>) -> Self {
        Self {
            users,
            after_sign_in: after_sign_in.into(),
        }
    }

    /// Landing path, honouring a site-relative `redirectTo` field
    fn redirect_target(&self, form: &FormData) -> String {
        match form.get("redirectTo") {
            Some(to) if to.starts_with('/') && !to.starts_with("//") => to.to_string(),
            _ => self.after_sign_in.clone(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for CredentialsProvider {
    async fn sign_in(&self, strategy: &str, form: &FormData) -> Result<Session, SignInError> {
        if strategy != CREDENTIALS_STRATEGY {
            return Err(anyhow!("unknown sign-in strategy '{}'", strategy).into());
        }

        let rejected = || SignInError::Auth(AuthError::new(AuthErrorKind::CredentialsSignin));

        let Some(credentials) = Credentials::from_form(form) else {
            return Err(rejected());
        };

        let user = self
            .users
            .find_by_email(&credentials.email)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "user lookup failed during sign-in");
                SignInError::Auth(AuthError::new(AuthErrorKind::CallbackRouteError))
            })?
            .ok_or_else(rejected)?;

        let matches = verify_password(&credentials.password, &user.password).map_err(|e| {
            tracing::warn!(error = %e, email = %user.email, "stored password hash is unusable");
            SignInError::Auth(AuthError::new(AuthErrorKind::CallbackRouteError))
        })?;
        if !matches {
            return Err(rejected());
        }

        Ok(Session {
            user_id: user.id,
            email: user.email,
            redirect_to: self.redirect_target(form),
        })
    }
}

/// Hash a password into an argon2 PHC string with a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?
        .to_string();
    Ok(hash)
}

/// Check a password against a stored PHC string
///
/// A mismatch is `Ok(false)`; a malformed stored hash is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow!("invalid stored hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
