//! Invoice records and the payloads written to the store

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    /// Exact match only: `"Paid"` or `" paid"` are rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}

/// A persisted invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    /// Amount in cents
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Insert payload for a new invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Update payload; the date is never resubmitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// Convert a major-unit amount into cents, rounding to the nearest cent
///
/// `12.5` becomes `1250`; float noise such as `0.29 * 100 = 28.999...` is
/// rounded back to `29`. Callers pass amounts already bounded by
/// [`MAX_AMOUNT`](crate::core::validation::schema::MAX_AMOUNT).
pub fn amount_in_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Today's date at UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
