use crate::dashboard::{confirm, Answered};
use crate::handlers::views::{ConfirmDeleteTemplate, InvoiceDetailView, InvoiceTemplate};
use crate::models::GenerateInvoiceForm;
use crate::services::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use service_core::error::AppError;

#[derive(Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default)]
    pub confirm: String,
}

impl DeleteConfirmation {
    fn answer(&self) -> Answered {
        Answered(self.confirm.eq_ignore_ascii_case("yes"))
    }
}

pub async fn refresh_invoices(State(state): State<AppState>) -> impl IntoResponse {
    state.dashboard.load_invoices().await;
    Redirect::to("/")
}

pub async fn generate_invoice(
    State(state): State<AppState>,
    Form(form): Form<GenerateInvoiceForm>,
) -> impl IntoResponse {
    let outcome = state.dashboard.generate_invoice(form).await;
    tracing::debug!(?outcome, "Generate invoice submitted");
    Redirect::to("/")
}

pub async fn confirm_delete_page(Path(invoice_id): Path<String>) -> impl IntoResponse {
    ConfirmDeleteTemplate {
        prompt: confirm::delete_prompt(&invoice_id),
        invoice_id,
    }
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    Form(confirmation): Form<DeleteConfirmation>,
) -> impl IntoResponse {
    let outcome = state
        .dashboard
        .delete_invoice(&invoice_id, &confirmation.answer())
        .await;
    tracing::debug!(invoice_id = %invoice_id, ?outcome, "Delete invoice submitted");
    Redirect::to("/")
}

pub async fn invoice_detail(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> impl IntoResponse {
    match state.dashboard.invoice_detail(&invoice_id).await {
        Ok(invoice) => InvoiceTemplate {
            invoice: Some(InvoiceDetailView::from(&invoice)),
            error: None,
            invoice_id,
        },
        Err(e) => InvoiceTemplate {
            invoice: None,
            error: Some(e.to_string()),
            invoice_id,
        },
    }
}

pub async fn export_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let xml = state
        .dashboard
        .export_invoice(&invoice_id)
        .await
        .map_err(upstream_error)?;

    let filename: String = invoice_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    Ok((
        [
            (header::CONTENT_TYPE, "application/xml".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"invoice-{}.xml\"", filename),
            ),
        ],
        xml,
    ))
}

/// Map an upstream failure onto the response the browser gets.
pub fn upstream_error(err: ApiError) -> AppError {
    match err {
        ApiError::Server {
            status: 404,
            message,
        } => AppError::NotFound(message),
        ApiError::Server { message, .. } => AppError::BadGateway(message),
        ApiError::Transport(message) => AppError::ServiceUnavailable(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        let yes = DeleteConfirmation {
            confirm: "yes".to_string(),
        };
        let no = DeleteConfirmation {
            confirm: "no".to_string(),
        };
        let missing = DeleteConfirmation {
            confirm: String::new(),
        };

        assert_eq!(yes.answer(), Answered(true));
        assert_eq!(no.answer(), Answered(false));
        assert_eq!(missing.answer(), Answered(false));
    }

    #[test]
    fn upstream_not_found_stays_not_found() {
        let err = upstream_error(ApiError::Server {
            status: 404,
            message: "Invoice not found".to_string(),
        });
        assert!(matches!(err, AppError::NotFound(m) if m == "Invoice not found"));
    }

    #[test]
    fn unreachable_upstream_is_unavailable() {
        let err = upstream_error(ApiError::Transport("connection refused".to_string()));
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }
}
