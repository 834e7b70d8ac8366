//! HTTP client for the external invoice API.
//!
//! Every call is fire-once: no retry, no backoff. Failures are collapsed into
//! [`ApiError`], whose `Display` is the text shown to the user.

use crate::config::InvoiceApiSettings;
use crate::models::{
    ApiErrorBody, ApplyCreditRequest, Credit, GenerateInvoiceRequest, Invoice, InvoiceSummary,
    RaiseCreditRequest,
};
use crate::services::metrics;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use service_core::observability::TracedClientExt;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a usable response: connection failure,
    /// timeout, or a body that did not parse.
    #[error("{0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }
}

/// The invoice API operations the dashboard consumes.
#[async_trait]
pub trait InvoiceApi: Send + Sync {
    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, ApiError>;

    async fn generate_invoice(&self, request: &GenerateInvoiceRequest)
        -> Result<Invoice, ApiError>;

    async fn delete_invoice(&self, invoice_id: &str) -> Result<(), ApiError>;

    async fn raise_credit(&self, request: &RaiseCreditRequest) -> Result<Credit, ApiError>;

    async fn get_invoice(&self, invoice_id: &str) -> Result<Invoice, ApiError>;

    /// UBL XML document for the invoice.
    async fn export_invoice(&self, invoice_id: &str) -> Result<String, ApiError>;

    async fn apply_credit(
        &self,
        invoice_id: &str,
        request: &ApplyCreditRequest,
    ) -> Result<Invoice, ApiError>;
}

pub struct InvoiceApiClient {
    client: Client,
    settings: InvoiceApiSettings,
}

impl InvoiceApiClient {
    pub fn new(settings: InvoiceApiSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build invoice API client: {}", e))?;

        Ok(Self { client, settings })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }
}

/// Segment-encode an invoice id so ids with `/` or spaces stay one segment.
fn invoice_path(invoice_id: &str, suffix: &str) -> String {
    format!("/v1/invoices/{}{}", urlencoding::encode(invoice_id), suffix)
}

/// Turn a failed response into the user-facing message: the API's `message`
/// field when present, otherwise the status code.
async fn server_error(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| status_message(status));

    ApiError::Server {
        status: status.as_u16(),
        message,
    }
}

fn status_message(status: StatusCode) -> String {
    format!("Request failed with status {}", status.as_u16())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Transport(format!("Invalid response from invoice API: {}", e)))
}

fn transport_error(url: &str, err: reqwest::Error) -> ApiError {
    tracing::error!(url = %url, error = %err, "Invoice API request failed");
    if err.is_timeout() {
        ApiError::Transport("Invoice API did not respond in time".to_string())
    } else {
        ApiError::Transport(format!("Could not reach invoice API: {}", err))
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(server_error(response).await)
    }
}

/// The list endpoint reports failures by status alone; its body is not read.
fn check_status_only(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Server {
            status: status.as_u16(),
            message: status_message(status),
        })
    }
}

/// Time and count one upstream call.
async fn observed<T, F>(operation: &'static str, call: F) -> Result<T, ApiError>
where
    F: std::future::Future<Output = Result<T, ApiError>>,
{
    let started = Instant::now();
    let result = call.await;
    let outcome = match &result {
        Ok(_) => "success",
        Err(ApiError::Server { .. }) => "server_error",
        Err(ApiError::Transport(_)) => "transport_error",
    };
    metrics::record_api_call(operation, outcome, started.elapsed());
    if let Err(e) = &result {
        tracing::warn!(operation, status = ?e.status(), error = %e, "Invoice API call failed");
    }
    result
}

#[async_trait]
impl InvoiceApi for InvoiceApiClient {
    async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, ApiError> {
        let url = self.url("/v1/invoices");
        observed("list_invoices", async {
            let mut request = self.client.traced_get(&url);
            if let Some(limit) = self.settings.list_limit {
                request = request.query(&[("limit", limit)]);
            }
            let response = request.send().await.map_err(|e| transport_error(&url, e))?;
            read_json(check_status_only(response)?).await
        })
        .await
    }

    async fn generate_invoice(
        &self,
        request: &GenerateInvoiceRequest,
    ) -> Result<Invoice, ApiError> {
        let url = self.url("/v1/invoices/generate");
        observed("generate_invoice", async {
            let response = self
                .client
                .traced_post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| transport_error(&url, e))?;
            read_json(check(response).await?).await
        })
        .await
    }

    async fn delete_invoice(&self, invoice_id: &str) -> Result<(), ApiError> {
        let url = self.url(&invoice_path(invoice_id, ""));
        observed("delete_invoice", async {
            let response = self
                .client
                .traced_delete(&url)
                .send()
                .await
                .map_err(|e| transport_error(&url, e))?;
            // 200 and 204 alike; the body, if any, is ignored.
            check(response).await.map(|_| ())
        })
        .await
    }

    async fn raise_credit(&self, request: &RaiseCreditRequest) -> Result<Credit, ApiError> {
        let url = self.url("/v1/credits");
        observed("raise_credit", async {
            let response = self
                .client
                .traced_post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| transport_error(&url, e))?;
            read_json(check(response).await?).await
        })
        .await
    }

    async fn get_invoice(&self, invoice_id: &str) -> Result<Invoice, ApiError> {
        let url = self.url(&invoice_path(invoice_id, ""));
        observed("get_invoice", async {
            let response = self
                .client
                .traced_get(&url)
                .send()
                .await
                .map_err(|e| transport_error(&url, e))?;
            read_json(check(response).await?).await
        })
        .await
    }

    async fn export_invoice(&self, invoice_id: &str) -> Result<String, ApiError> {
        let url = self.url(&invoice_path(invoice_id, "/export"));
        observed("export_invoice", async {
            let response = self
                .client
                .traced_get(&url)
                .header("accept", "application/xml")
                .send()
                .await
                .map_err(|e| transport_error(&url, e))?;
            check(response)
                .await?
                .text()
                .await
                .map_err(|e| ApiError::Transport(format!("Invalid response from invoice API: {}", e)))
        })
        .await
    }

    async fn apply_credit(
        &self,
        invoice_id: &str,
        request: &ApplyCreditRequest,
    ) -> Result<Invoice, ApiError> {
        let url = self.url(&invoice_path(invoice_id, "/apply-credit"));
        observed("apply_credit", async {
            let response = self
                .client
                .traced_post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| transport_error(&url, e))?;
            read_json(check(response).await?).await
        })
        .await
    }
}
