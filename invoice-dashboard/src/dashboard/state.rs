//! In-memory view state shared by every dashboard operation.

use chrono::{DateTime, Utc};

use crate::models::{Credit, GenerateInvoiceForm, InvoiceSummary, RaiseCreditForm};

const OPERATION_COUNT: usize = 5;

/// The independent async operations the dashboard runs. Each has its own
/// loading flag, messages and request-token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadInvoices,
    GenerateInvoice,
    DeleteInvoice,
    RaiseCredit,
    ApplyCredit,
}

impl Operation {
    pub const ALL: [Operation; OPERATION_COUNT] = [
        Operation::LoadInvoices,
        Operation::GenerateInvoice,
        Operation::DeleteInvoice,
        Operation::RaiseCredit,
        Operation::ApplyCredit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LoadInvoices => "load_invoices",
            Operation::GenerateInvoice => "generate_invoice",
            Operation::DeleteInvoice => "delete_invoice",
            Operation::RaiseCredit => "raise_credit",
            Operation::ApplyCredit => "apply_credit",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Ticket for one issued request. Only the latest ticket of an operation may
/// change that operation's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub operation: Operation,
    pub sequence: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTokens {
    latest: [u64; OPERATION_COUNT],
}

impl RequestTokens {
    pub fn issue(&mut self, operation: Operation) -> RequestToken {
        let slot = &mut self.latest[operation.index()];
        *slot += 1;
        RequestToken {
            operation,
            sequence: *slot,
        }
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest[token.operation.index()] == token.sequence
    }
}

/// Loading flag and the single message line of one panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Last accepted `GET /v1/invoices` body, replaced wholesale.
    pub invoices: Vec<InvoiceSummary>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub mounted: bool,
    pub generate_draft: GenerateInvoiceForm,
    pub credit_draft: RaiseCreditForm,
    /// Last credit returned by the API, offered for application.
    pub last_credit: Option<Credit>,
    panels: [PanelState; OPERATION_COUNT],
    tokens: RequestTokens,
}

impl DashboardState {
    pub fn panel(&self, operation: Operation) -> &PanelState {
        &self.panels[operation.index()]
    }

    pub fn panel_mut(&mut self, operation: Operation) -> &mut PanelState {
        &mut self.panels[operation.index()]
    }

    /// Issue a token and put the operation's panel into its loading state.
    pub fn begin(&mut self, operation: Operation) -> RequestToken {
        let token = self.tokens.issue(operation);
        let panel = self.panel_mut(operation);
        panel.loading = true;
        panel.error = None;
        panel.success = None;
        token
    }

    /// Close out a request. Returns `false`, leaving everything untouched, if
    /// a newer request of the same operation has been issued since.
    pub fn settle(&mut self, token: RequestToken) -> bool {
        if !self.tokens.is_latest(token) {
            return false;
        }
        self.panel_mut(token.operation).loading = false;
        true
    }

    pub fn succeed(&mut self, operation: Operation, message: Option<String>) {
        let panel = self.panel_mut(operation);
        panel.error = None;
        panel.success = message;
    }

    pub fn fail(&mut self, operation: Operation, message: String) {
        let panel = self.panel_mut(operation);
        panel.success = None;
        panel.error = Some(message);
    }

    pub fn replace_invoices(&mut self, invoices: Vec<InvoiceSummary>) {
        self.invoices = invoices;
        self.loaded_at = Some(Utc::now());
    }

    pub fn any_loading(&self) -> bool {
        self.panels.iter().any(|p| p.loading)
    }
}
