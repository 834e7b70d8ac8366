use crate::models::RaiseCreditForm;
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};

pub async fn raise_credit(
    State(state): State<AppState>,
    Form(form): Form<RaiseCreditForm>,
) -> impl IntoResponse {
    let outcome = state.dashboard.raise_credit(form).await;
    tracing::debug!(?outcome, "Raise credit submitted");
    Redirect::to("/#credits")
}

pub async fn apply_credit(State(state): State<AppState>) -> impl IntoResponse {
    let outcome = state.dashboard.apply_last_credit().await;
    tracing::debug!(?outcome, "Apply credit submitted");
    Redirect::to("/#credits")
}
