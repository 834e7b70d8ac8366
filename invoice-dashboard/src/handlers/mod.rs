pub mod app;
pub mod credits;
pub mod invoices;
pub mod metrics;
pub mod views;
