//! Dashboard operations: user action → invoice API call → state update.
//!
//! Operations run concurrently; each only touches its own panel. A response
//! is applied only if its request is still the latest of its kind, so a slow
//! earlier request can never overwrite a newer result. The state lock is
//! never held across an API call.

pub mod confirm;
pub mod state;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{ApplyCreditRequest, GenerateInvoiceForm, Invoice, RaiseCreditForm};
use crate::services::metrics;
use crate::services::{ApiError, InvoiceApi};

pub use confirm::{Answered, Confirmation};
pub use state::{DashboardState, Operation, PanelState, RequestToken};

/// How an operation ended, from the dashboard's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    /// A newer request of the same kind was issued; this response was dropped.
    Discarded,
    /// The user declined the confirmation; nothing was sent.
    Declined,
    /// Local input checks failed; nothing was sent.
    Rejected,
}

#[derive(Clone)]
pub struct Dashboard {
    api: Arc<dyn InvoiceApi>,
    state: Arc<RwLock<DashboardState>>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn InvoiceApi>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(DashboardState::default())),
        }
    }

    /// Copy of the current state for rendering.
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Load the list the first time the dashboard is shown.
    pub async fn mount(&self) {
        let first = {
            let mut state = self.state.write().await;
            !std::mem::replace(&mut state.mounted, true)
        };
        if first {
            self.load_invoices().await;
        }
    }

    async fn begin(&self, operation: Operation) -> RequestToken {
        self.state.write().await.begin(operation)
    }

    fn discard(token: RequestToken) -> Outcome {
        tracing::debug!(
            operation = token.operation.as_str(),
            sequence = token.sequence,
            "Discarding response superseded by a newer request"
        );
        metrics::record_stale_response(token.operation.as_str());
        Outcome::Discarded
    }

    /// `GET /v1/invoices`; on success the list is replaced wholesale, on
    /// failure the previous list stays.
    pub async fn load_invoices(&self) -> Outcome {
        let token = self.begin(Operation::LoadInvoices).await;
        let result = self.api.list_invoices().await;

        let mut state = self.state.write().await;
        if !state.settle(token) {
            return Self::discard(token);
        }
        match result {
            Ok(invoices) => {
                tracing::info!(count = invoices.len(), "Invoice list refreshed");
                state.replace_invoices(invoices);
                state.succeed(Operation::LoadInvoices, None);
                Outcome::Succeeded
            }
            Err(e) => {
                state.fail(Operation::LoadInvoices, e.to_string());
                Outcome::Failed
            }
        }
    }

    /// Submit the generate form. The draft is kept on failure and reset on
    /// success, after which the list is reloaded.
    pub async fn generate_invoice(&self, form: GenerateInvoiceForm) -> Outcome {
        let request = form.to_request();
        let token = {
            let mut state = self.state.write().await;
            state.generate_draft = form;
            state.begin(Operation::GenerateInvoice)
        };

        let result = self.api.generate_invoice(&request).await;
        let generated = result.is_ok();

        let outcome = {
            let mut state = self.state.write().await;
            if state.settle(token) {
                match result {
                    Ok(invoice) => {
                        tracing::info!(invoice_id = %invoice.invoice_id, "Invoice generated");
                        state.succeed(
                            Operation::GenerateInvoice,
                            Some(generated_message(&invoice)),
                        );
                        state.generate_draft = GenerateInvoiceForm::default();
                        Outcome::Succeeded
                    }
                    Err(e) => {
                        state.fail(Operation::GenerateInvoice, e.to_string());
                        Outcome::Failed
                    }
                }
            } else {
                Self::discard(token)
            }
        };

        // The invoice exists server-side even if this response was superseded.
        if generated {
            self.load_invoices().await;
        }
        outcome
    }

    /// Delete after the user confirms. Any 2xx is success and triggers one
    /// reload; a failure leaves the displayed list alone.
    pub async fn delete_invoice(
        &self,
        invoice_id: &str,
        confirmation: &dyn Confirmation,
    ) -> Outcome {
        if !confirmation.confirm(&confirm::delete_prompt(invoice_id)) {
            tracing::debug!(invoice_id, "Delete declined");
            return Outcome::Declined;
        }

        let token = self.begin(Operation::DeleteInvoice).await;
        let result = self.api.delete_invoice(invoice_id).await;
        let deleted = result.is_ok();

        let outcome = {
            let mut state = self.state.write().await;
            if state.settle(token) {
                match result {
                    Ok(()) => {
                        tracing::info!(invoice_id, "Invoice deleted");
                        state.succeed(
                            Operation::DeleteInvoice,
                            Some(format!("Invoice {} deleted", invoice_id)),
                        );
                        Outcome::Succeeded
                    }
                    Err(e) => {
                        state.fail(Operation::DeleteInvoice, delete_failed_message(invoice_id, &e));
                        Outcome::Failed
                    }
                }
            } else {
                Self::discard(token)
            }
        };

        if deleted {
            self.load_invoices().await;
        }
        outcome
    }

    /// Raise a credit. Does not reload the invoice list.
    pub async fn raise_credit(&self, form: RaiseCreditForm) -> Outcome {
        let request = match form.to_request() {
            Ok(request) => request,
            Err(message) => {
                let mut state = self.state.write().await;
                // Supersede any credit request still in flight.
                let token = state.begin(Operation::RaiseCredit);
                state.settle(token);
                state.credit_draft = form;
                state.fail(Operation::RaiseCredit, message);
                return Outcome::Rejected;
            }
        };

        let token = {
            let mut state = self.state.write().await;
            state.credit_draft = form;
            state.begin(Operation::RaiseCredit)
        };

        let result = self.api.raise_credit(&request).await;

        let mut state = self.state.write().await;
        if !state.settle(token) {
            return Self::discard(token);
        }
        match result {
            Ok(credit) => {
                tracing::info!(
                    credit_id = %credit.credit_id,
                    invoice_id = %credit.invoice_id,
                    "Credit raised"
                );
                state.succeed(
                    Operation::RaiseCredit,
                    Some(format!(
                        "Credit {} raised against invoice {} for {}",
                        credit.credit_id,
                        credit.invoice_id,
                        format_amount(credit.amount)
                    )),
                );
                state.credit_draft = RaiseCreditForm::default();
                state.last_credit = Some(credit);
                Outcome::Succeeded
            }
            Err(e) => {
                state.fail(Operation::RaiseCredit, e.to_string());
                Outcome::Failed
            }
        }
    }

    /// Apply the most recently raised credit, in full, to its invoice.
    pub async fn apply_last_credit(&self) -> Outcome {
        let (token, credit) = {
            let mut state = self.state.write().await;
            let Some(credit) = state.last_credit.clone() else {
                let token = state.begin(Operation::ApplyCredit);
                state.settle(token);
                state.fail(
                    Operation::ApplyCredit,
                    "Raise a credit before applying it".to_string(),
                );
                return Outcome::Rejected;
            };
            (state.begin(Operation::ApplyCredit), credit)
        };

        let request = ApplyCreditRequest {
            credit_id: credit.credit_id.clone(),
            amount: credit.amount,
        };
        let result = self.api.apply_credit(&credit.invoice_id, &request).await;
        let applied = result.is_ok();

        let outcome = {
            let mut state = self.state.write().await;
            if state.settle(token) {
                match result {
                    Ok(invoice) => {
                        tracing::info!(
                            credit_id = %credit.credit_id,
                            invoice_id = %invoice.invoice_id,
                            "Credit applied"
                        );
                        state.succeed(
                            Operation::ApplyCredit,
                            Some(format!(
                                "Credit {} applied to invoice {}; new total {}",
                                credit.credit_id,
                                invoice.invoice_id,
                                format_amount(invoice.total_amount.unwrap_or(0.0))
                            )),
                        );
                        state.last_credit = None;
                        Outcome::Succeeded
                    }
                    Err(e) => {
                        state.fail(Operation::ApplyCredit, e.to_string());
                        Outcome::Failed
                    }
                }
            } else {
                Self::discard(token)
            }
        };

        if applied {
            self.load_invoices().await;
        }
        outcome
    }

    /// Full invoice for the detail page. Not part of the shared state.
    pub async fn invoice_detail(&self, invoice_id: &str) -> Result<Invoice, ApiError> {
        self.api.get_invoice(invoice_id).await
    }

    /// UBL XML export, passed through untouched.
    pub async fn export_invoice(&self, invoice_id: &str) -> Result<String, ApiError> {
        self.api.export_invoice(invoice_id).await
    }
}

fn generated_message(invoice: &Invoice) -> String {
    format!(
        "Invoice {} generated with total {}",
        invoice.invoice_id,
        format_amount(invoice.total_amount.unwrap_or(0.0))
    )
}

fn delete_failed_message(invoice_id: &str, err: &ApiError) -> String {
    format!("Could not delete invoice {}: {}", invoice_id, err)
}

/// Shortest decimal form: `100`, `12.5`.
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}
