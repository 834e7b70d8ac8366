use serde::{Deserialize, Serialize};

/// Credit raised against an invoice. Never mutated by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    pub credit_id: String,
    pub invoice_id: String,
    pub status: String,
    pub amount: f64,
    #[serde(default)]
    pub created_at: String,
}

/// Body of `POST /v1/credits`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaiseCreditRequest {
    pub invoice_id: String,
    pub amount: f64,
}

/// Body of `POST /v1/invoices/{id}/apply-credit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCreditRequest {
    pub credit_id: String,
    pub amount: f64,
}
