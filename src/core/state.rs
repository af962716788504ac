//! Result types handed back to the submitting view
//!
//! Every action follows the stateful-action convention: it is called with the
//! state the view rendered last plus the new submission, and it produces the
//! next state. A successful create/update instead transfers control to another
//! view, which is modeled as [`ActionOutcome::Redirect`] rather than an unwind.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-field validation messages, keyed by the submitted form field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one message
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Names of the failing fields, in sorted order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Merge another set of messages into this one
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }
}

/// State rendered back into a form after a submission attempt
///
/// Created fresh for each attempt and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    /// State carrying only a summary message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }

    /// State carrying field errors and a summary message
    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors: Some(errors),
            message: Some(message.into()),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// What an action produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome<S = FormState> {
    /// Control moves to another view; nothing is returned to the caller
    Redirect(String),

    /// The action finished and hands a new state back to the view
    State(S),
}

impl<S> ActionOutcome<S> {
    pub fn redirect(to: impl Into<String>) -> Self {
        ActionOutcome::Redirect(to.into())
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, ActionOutcome::Redirect(_))
    }

    /// Target of the redirect, if this outcome is one
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            ActionOutcome::Redirect(to) => Some(to),
            ActionOutcome::State(_) => None,
        }
    }

    /// The returned state, if the action did not redirect
    pub fn into_state(self) -> Option<S> {
        match self {
            ActionOutcome::Redirect(_) => None,
            ActionOutcome::State(state) => Some(state),
        }
    }
}

impl<S: Serialize> IntoResponse for ActionOutcome<S> {
    fn into_response(self) -> Response {
        match self {
            // 303 so the browser follows up with a GET on the listing view
            ActionOutcome::Redirect(to) => Redirect::to(&to).into_response(),
            ActionOutcome::State(state) => (StatusCode::OK, Json(state)).into_response(),
        }
    }
}
