use crate::handlers::views::DashboardTemplate;
use crate::AppState;
use axum::{extract::State, response::IntoResponse};

/// The dashboard page. The first view triggers the initial list load.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    state.dashboard.mount().await;
    DashboardTemplate::from_state(&state.dashboard.snapshot().await)
}

pub async fn health_check() -> &'static str {
    "OK"
}
