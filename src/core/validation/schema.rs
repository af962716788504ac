//! Invoice form schema
//!
//! [`InvoiceInput`] is the subset of the invoice form that the create and edit
//! views submit; [`InvoiceForm`] is the full shape including the `id` and
//! `date` fields that the actions normally supply themselves.
//!
//! Parsing never panics or returns early on the first problem: every field is
//! checked and all failures are reported together.

use super::validators::{coerce_number, date_format, one_of, required};
use crate::core::error::ValidationError;
use crate::core::form::FormData;
use crate::core::invoice::InvoiceStatus;
use crate::core::state::FieldErrors;
use chrono::NaiveDate;
use validator::Validate;

pub const CUSTOMER_ID: &str = "customerId";
pub const AMOUNT: &str = "amount";
pub const STATUS: &str = "status";
pub const ID: &str = "id";
pub const DATE: &str = "date";

pub const CUSTOMER_MESSAGE: &str = "please select a customer.";
pub const AMOUNT_MESSAGE: &str = "please enter a number greater than $0.";
pub const STATUS_MESSAGE: &str = "please select a status.";
pub const REQUIRED_MESSAGE: &str = "required.";
pub const DATE_MESSAGE: &str = "please enter a date as YYYY-MM-DD.";

/// Largest accepted amount in major units; its cents value fits a `BIGINT`
pub const MAX_AMOUNT: f64 = 1e15;

/// Outcome of parsing a form against a schema
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Coerced fields submitted by the create and edit invoice forms
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct InvoiceInput {
    pub customer_id: String,

    /// Major units (dollars), before conversion to cents
    #[validate(range(
        exclusive_min = 0.0,
        max = MAX_AMOUNT,
        message = "please enter a number greater than $0."
    ))]
    pub amount: f64,

    pub status: InvoiceStatus,
}

impl InvoiceInput {
    /// Parse `customerId`, `amount` and `status` out of a submission
    pub fn safe_parse(form: &FormData) -> ValidationResult<Self> {
        let mut errors = FieldErrors::new();

        let customer_id = required(CUSTOMER_MESSAGE)(form.get(CUSTOMER_ID))
            .map_err(|m| errors.add(CUSTOMER_ID, m))
            .ok();
        let amount = coerce_number(AMOUNT_MESSAGE)(form.get(AMOUNT))
            .map_err(|m| errors.add(AMOUNT, m))
            .ok();
        let status = one_of::<InvoiceStatus>(STATUS_MESSAGE)(form.get(STATUS))
            .map_err(|m| errors.add(STATUS, m))
            .ok();

        // The range rule needs a coerced amount. Only `amount` carries rules,
        // so the stand-ins for fields that already failed never add messages.
        let Some(amount) = amount else {
            return Err(ValidationError::Fields(errors));
        };
        let candidate = InvoiceInput {
            customer_id: customer_id.clone().unwrap_or_default(),
            amount,
            status: status.unwrap_or(InvoiceStatus::Pending),
        };
        if let Err(rule_errors) = candidate.validate() {
            errors.extend(field_errors_from(&rule_errors));
        }

        if errors.is_empty() && customer_id.is_some() && status.is_some() {
            Ok(candidate)
        } else {
            Err(ValidationError::Fields(errors))
        }
    }
}

/// The full invoice form: the submitted subset plus `id` and `date`
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceForm {
    pub id: String,
    pub date: NaiveDate,
    pub input: InvoiceInput,
}

impl InvoiceForm {
    pub fn safe_parse(form: &FormData) -> ValidationResult<Self> {
        let mut errors = FieldErrors::new();

        let id = required(REQUIRED_MESSAGE)(form.get(ID))
            .map_err(|m| errors.add(ID, m))
            .ok();
        let date = date_format("%Y-%m-%d", DATE_MESSAGE)(form.get(DATE))
            .map_err(|m| errors.add(DATE, m))
            .ok();
        let input = InvoiceInput::safe_parse(form)
            .map_err(|e| errors.extend(e.into_field_errors()))
            .ok();

        match (id, date, input) {
            (Some(id), Some(date), Some(input)) => Ok(InvoiceForm { id, date, input }),
            _ => Err(ValidationError::Fields(errors)),
        }
    }
}

/// Map the `validator` crate's report onto form field names
fn field_errors_from(report: &validator::ValidationErrors) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, failures) in report.field_errors() {
        let name = form_field_name(&field);
        for failure in failures.iter() {
            let message = failure
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| failure.code.to_string());
            errors.add(name, message);
        }
    }
    errors
}

fn form_field_name(field: &str) -> &str {
    match field {
        "customer_id" => CUSTOMER_ID,
        "amount" => AMOUNT,
        "status" => STATUS,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(customer: Option<&str>, amount: Option<&str>, status: Option<&str>) -> FormData {
        let mut form = FormData::new();
        if let Some(c) = customer {
            form.append(CUSTOMER_ID, c);
        }
        if let Some(a) = amount {
            form.append(AMOUNT, a);
        }
        if let Some(s) = status {
            form.append(STATUS, s);
        }
        form
    }

    fn field_errors(result: ValidationResult<InvoiceInput>) -> FieldErrors {
        result.unwrap_err().into_field_errors()
    }

    #[test]
    fn test_valid_input_is_coerced() {
        let input = InvoiceInput::safe_parse(&form(Some("c1"), Some("12.50"), Some("paid"))).unwrap();

        assert_eq!(input.customer_id, "c1");
        assert_eq!(input.amount, 12.5);
        assert_eq!(input.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_empty_submission_reports_every_field() {
        let errors = field_errors(InvoiceInput::safe_parse(&FormData::new()));

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(CUSTOMER_ID).unwrap(), [CUSTOMER_MESSAGE]);
        assert_eq!(errors.get(AMOUNT).unwrap(), [AMOUNT_MESSAGE]);
        assert_eq!(errors.get(STATUS).unwrap(), [STATUS_MESSAGE]);
    }

    #[test]
    fn test_missing_customer_only_flags_customer() {
        let errors = field_errors(InvoiceInput::safe_parse(&form(None, Some("10"), Some("pending"))));

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![CUSTOMER_ID]);
    }

    #[test]
    fn test_zero_and_negative_amounts_fail_range() {
        for amount in ["0", "-1", "-0.01", "0.00"] {
            let errors =
                field_errors(InvoiceInput::safe_parse(&form(Some("c1"), Some(amount), Some("paid"))));
            assert_eq!(errors.get(AMOUNT).unwrap(), [AMOUNT_MESSAGE], "amount {}", amount);
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_non_numeric_amount_gets_single_message() {
        let errors = field_errors(InvoiceInput::safe_parse(&form(Some("c1"), Some("abc"), Some("paid"))));

        assert_eq!(errors.get(AMOUNT).unwrap(), [AMOUNT_MESSAGE]);
    }

    #[test]
    fn test_amount_beyond_cents_range_fails() {
        for amount in ["1e300", "1e17", "1000000000000001"] {
            let errors =
                field_errors(InvoiceInput::safe_parse(&form(Some("c1"), Some(amount), Some("paid"))));
            assert_eq!(errors.get(AMOUNT).unwrap(), [AMOUNT_MESSAGE], "amount {}", amount);
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_max_amount_passes_and_fits_in_cents() {
        let input =
            InvoiceInput::safe_parse(&form(Some("c1"), Some("1000000000000000"), Some("paid"))).unwrap();
        let cents = crate::core::invoice::amount_in_cents(input.amount);
        assert_eq!(cents, 100_000_000_000_000_000);
        assert!(cents < i64::MAX);
    }

    #[test]
    fn test_small_positive_amount_passes() {
        let input = InvoiceInput::safe_parse(&form(Some("c1"), Some("0.01"), Some("pending"))).unwrap();
        assert_eq!(input.amount, 0.01);
    }

    #[test]
    fn test_unknown_status_fails() {
        let errors =
            field_errors(InvoiceInput::safe_parse(&form(Some("c1"), Some("10"), Some("overdue"))));

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![STATUS]);
        assert_eq!(errors.get(STATUS).unwrap(), [STATUS_MESSAGE]);
    }

    #[test]
    fn test_range_error_reported_alongside_status_error() {
        let errors = field_errors(InvoiceInput::safe_parse(&form(Some("c1"), Some("0"), None)));

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![AMOUNT, STATUS]);
    }

    #[test]
    fn test_empty_customer_is_accepted() {
        let input = InvoiceInput::safe_parse(&form(Some(""), Some("5"), Some("paid"))).unwrap();
        assert_eq!(input.customer_id, "");
    }

    #[test]
    fn test_full_form_requires_id_and_date() {
        let result = InvoiceForm::safe_parse(&form(Some("c1"), Some("5"), Some("paid")));
        let errors = result.unwrap_err().into_field_errors();

        assert!(errors.contains(ID));
        assert!(errors.contains(DATE));
        assert!(!errors.contains(AMOUNT));
    }

    #[test]
    fn test_full_form_parses() {
        let data = form(Some("c1"), Some("5"), Some("paid"))
            .with(ID, "i1")
            .with(DATE, "2024-06-01");

        let parsed = InvoiceForm::safe_parse(&data).unwrap();

        assert_eq!(parsed.id, "i1");
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(parsed.input.amount, 5.0);
    }
}
