//! Askama templates and the flattened view models they render.

use askama::Template;

use crate::dashboard::{format_amount, DashboardState, Operation, PanelState};
use crate::models::{Credit, GenerateInvoiceForm, Invoice, InvoiceSummary, RaiseCreditForm};

const MISSING: &str = "—";

/// One table row, keyed by invoice id.
pub struct InvoiceRow {
    pub invoice_id: String,
    pub status: String,
    pub customer: String,
    pub issue_date: String,
    pub total: String,
}

impl From<&InvoiceSummary> for InvoiceRow {
    fn from(summary: &InvoiceSummary) -> Self {
        Self {
            invoice_id: summary.invoice_id.clone(),
            status: summary.status.clone(),
            customer: non_empty(summary.customer_id.as_deref()),
            issue_date: non_empty(summary.issue_date.as_deref()),
            total: format_amount(summary.total_amount.unwrap_or(0.0)),
        }
    }
}

fn non_empty(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

pub struct CreditView {
    pub credit_id: String,
    pub invoice_id: String,
    pub status: String,
    pub amount: String,
    pub created_at: String,
}

impl From<&Credit> for CreditView {
    fn from(credit: &Credit) -> Self {
        Self {
            credit_id: credit.credit_id.clone(),
            invoice_id: credit.invoice_id.clone(),
            status: credit.status.clone(),
            amount: format_amount(credit.amount),
            created_at: non_empty(Some(&credit.created_at)),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub list: PanelState,
    pub generate: PanelState,
    pub delete: PanelState,
    pub credit: PanelState,
    pub apply: PanelState,
    pub invoices: Vec<InvoiceRow>,
    pub loaded_at: Option<String>,
    pub generate_draft: GenerateInvoiceForm,
    pub credit_draft: RaiseCreditForm,
    pub last_credit: Option<CreditView>,
}

impl DashboardTemplate {
    pub fn from_state(state: &DashboardState) -> Self {
        Self {
            list: state.panel(Operation::LoadInvoices).clone(),
            generate: state.panel(Operation::GenerateInvoice).clone(),
            delete: state.panel(Operation::DeleteInvoice).clone(),
            credit: state.panel(Operation::RaiseCredit).clone(),
            apply: state.panel(Operation::ApplyCredit).clone(),
            invoices: state.invoices.iter().map(InvoiceRow::from).collect(),
            loaded_at: state
                .loaded_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
            generate_draft: state.generate_draft.clone(),
            credit_draft: state.credit_draft.clone(),
            last_credit: state.last_credit.as_ref().map(CreditView::from),
        }
    }
}

pub struct InvoiceDetailView {
    pub invoice_id: String,
    pub status: String,
    pub customer: String,
    pub issue_date: String,
    pub due_date: String,
    pub total: String,
    pub currency: String,
    pub line_count: usize,
    pub credits: Vec<AppliedCreditView>,
}

pub struct AppliedCreditView {
    pub credit_id: String,
    pub amount: String,
}

impl From<&Invoice> for InvoiceDetailView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_id: invoice.invoice_id.clone(),
            status: non_empty(invoice.status.as_deref()),
            customer: non_empty(invoice.customer_id.as_deref()),
            issue_date: non_empty(invoice.issue_date.as_deref()),
            due_date: non_empty(invoice.due_date.as_deref()),
            total: format_amount(invoice.total_amount.unwrap_or(0.0)),
            currency: non_empty(invoice.currency.as_deref()),
            line_count: invoice.lines.len(),
            credits: invoice
                .credits_applied
                .iter()
                .map(|c| AppliedCreditView {
                    credit_id: c.credit_id.clone(),
                    amount: format_amount(c.amount),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "invoice.html")]
pub struct InvoiceTemplate {
    pub invoice_id: String,
    pub invoice: Option<InvoiceDetailView>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub invoice_id: String,
    pub prompt: String,
}
