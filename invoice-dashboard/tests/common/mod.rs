#![allow(dead_code)]

use invoice_dashboard::config::InvoiceApiSettings;
use invoice_dashboard::dashboard::Dashboard;
use invoice_dashboard::services::InvoiceApiClient;
use invoice_dashboard::startup::build_router;
use invoice_dashboard::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::{MockServer, Request};

/// A dashboard wired to a fresh mock invoice API.
pub struct TestApp {
    pub api: MockServer,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_limit(None).await
    }

    pub async fn spawn_with_limit(list_limit: Option<u32>) -> Self {
        service_core::observability::init_test_tracing();

        let api = MockServer::start().await;
        let client = client_for(&api.uri(), list_limit);
        let state = AppState::new(Arc::new(client));

        Self { api, state }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.state.dashboard
    }

    pub fn router(&self) -> axum::Router {
        build_router(
            self.state.clone(),
            concat!(env!("CARGO_MANIFEST_DIR"), "/static"),
        )
    }

    /// Requests the mock API has seen, as (METHOD, path) pairs in arrival order.
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.received()
            .await
            .iter()
            .map(|r| (r.method.to_string(), r.url.path().to_string()))
            .collect()
    }

    pub async fn received(&self) -> Vec<Request> {
        self.api.received_requests().await.unwrap_or_default()
    }

    pub async fn count(&self, method: &str, path: &str) -> usize {
        self.calls()
            .await
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    /// JSON body of the first request to `path`.
    pub async fn body_of(&self, path: &str) -> Value {
        let request = self
            .received()
            .await
            .into_iter()
            .find(|r| r.url.path() == path)
            .unwrap_or_else(|| panic!("no request to {path}"));
        serde_json::from_slice(&request.body).expect("request body is JSON")
    }
}

pub fn client_for(base_url: &str, list_limit: Option<u32>) -> InvoiceApiClient {
    InvoiceApiClient::new(InvoiceApiSettings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        list_limit,
    })
    .expect("client builds")
}

pub fn summary(id: &str, status: &str, total: f64) -> Value {
    json!({
        "invoiceId": id,
        "status": status,
        "customerId": "CUST-1",
        "issueDate": "2026-10-19",
        "totalAmount": total
    })
}

pub fn invoice(id: &str, total: f64) -> Value {
    json!({
        "invoiceId": id,
        "status": "DRAFT",
        "customerId": "CUST-1",
        "issueDate": "2026-10-19",
        "dueDate": "2026-11-19",
        "totalAmount": total,
        "currency": "AUD",
        "lines": [],
        "creditsApplied": []
    })
}

pub fn credit(id: &str, invoice_id: &str, amount: f64) -> Value {
    json!({
        "creditId": id,
        "invoiceId": invoice_id,
        "status": "CREATED",
        "amount": amount,
        "createdAt": "2026-10-19T09:30:00Z"
    })
}
