pub mod config;
pub mod dashboard;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use dashboard::Dashboard;
use services::InvoiceApi;
use std::sync::Arc;

/// Shared application state: the single dashboard every request reads and
/// drives.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
}

impl AppState {
    pub fn new(api: Arc<dyn InvoiceApi>) -> Self {
        Self {
            dashboard: Dashboard::new(api),
        }
    }
}
