//! Form drafts as typed by the user. Fields stay raw text so a failed submit
//! can be shown back exactly as entered.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use super::{GenerateInvoiceRequest, RaiseCreditRequest, UserData};

const DEFAULT_CURRENCY: &str = "AUD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateInvoiceForm {
    #[serde(default)]
    pub order_xml: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub contract_ref: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for GenerateInvoiceForm {
    fn default() -> Self {
        Self {
            order_xml: String::new(),
            customer_id: String::new(),
            due_date: String::new(),
            total_amount: String::new(),
            currency: default_currency(),
            contract_ref: String::new(),
        }
    }
}

impl GenerateInvoiceForm {
    /// Build the API payload. A total that is not a finite number becomes 0;
    /// the API is left to reject what it considers invalid.
    pub fn to_request(&self) -> GenerateInvoiceRequest {
        GenerateInvoiceRequest {
            order_document: self.order_xml.clone(),
            user_data: UserData {
                customer_id: self.customer_id.clone(),
                due_date: self.due_date.clone(),
                total_amount: coerce_amount(&self.total_amount),
                currency: self.currency.clone(),
                lines: Vec::new(),
            },
            contract_reference: self.contract_ref.clone(),
            other_data: serde_json::Map::new(),
        }
    }
}

fn coerce_amount(raw: &str) -> f64 {
    parse_amount(raw).unwrap_or(0.0)
}

fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RaiseCreditForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Select an invoice to credit"))]
    pub invoice_id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_numeric_amount"))]
    pub amount: String,
}

fn validate_numeric_amount(value: &str) -> Result<(), ValidationError> {
    if parse_amount(value).is_some() {
        return Ok(());
    }
    let mut error = ValidationError::new("numeric");
    error.message = Some("Enter a numeric credit amount".into());
    Err(error)
}

impl RaiseCreditForm {
    /// Validate locally and build the API payload, or return the message to
    /// show in the credit panel.
    pub fn to_request(&self) -> Result<RaiseCreditRequest, String> {
        self.validate().map_err(|errors| first_message(&errors))?;

        Ok(RaiseCreditRequest {
            invoice_id: self.invoice_id.trim().to_string(),
            amount: coerce_amount(&self.amount),
        })
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["invoice_id", "amount"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid credit request".to_string())
}
