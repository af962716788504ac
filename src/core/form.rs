//! Raw form submissions
//!
//! A [`FormData`] is the key/value payload of a submitted form, with every
//! value still a string. It can be built by hand (tests, programmatic callers)
//! or extracted from an `application/x-www-form-urlencoded` request body.

use axum::{
    Form,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};

/// Key/value pairs of a submitted form, in submission order
///
/// Repeated keys are kept; [`FormData::get`] returns the first value, the way
/// a browser `FormData` does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value submitted under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(entries) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_first_value() {
        let form = FormData::new()
            .with("status", "pending")
            .with("status", "paid");

        assert_eq!(form.get("status"), Some("pending"));
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn test_missing_key_is_none() {
        let form: FormData = [("amount", "10")].into_iter().collect();

        assert!(form.get("customerId").is_none());
        assert!(form.contains_key("amount"));
        assert!(!form.is_empty());
    }

    #[tokio::test]
    async fn test_extracts_urlencoded_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/dashboard/invoices/create")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(axum::body::Body::from("customerId=c1&amount=12.50&status=paid"))
            .unwrap();

        let form = FormData::from_request(req, &()).await.unwrap();

        assert_eq!(form.get("customerId"), Some("c1"));
        assert_eq!(form.get("amount"), Some("12.50"));
        assert_eq!(form.get("status"), Some("paid"));
    }
}
