pub mod invoice_client;
pub mod metrics;

pub use invoice_client::{ApiError, InvoiceApi, InvoiceApiClient};
