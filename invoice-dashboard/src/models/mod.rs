//! Wire and draft types for the invoice dashboard.

mod credit;
mod forms;
mod invoice;

pub use credit::{ApplyCreditRequest, Credit, RaiseCreditRequest};
pub use forms::{GenerateInvoiceForm, RaiseCreditForm};
pub use invoice::{
    AppliedCredit, ApiErrorBody, GenerateInvoiceRequest, Invoice, InvoiceSummary, UserData,
};
