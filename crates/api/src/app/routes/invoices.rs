use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use billrun_core::InvoiceId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices))
        .route("/:id", get(get_invoice))
        .route("/:id/charge", post(charge_invoice))
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.invoices().await {
        Ok(invoices) => {
            let body: Vec<dto::InvoiceDto> = invoices.iter().map(dto::InvoiceDto::from).collect();
            Json(body).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: InvoiceId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid invoice id")
        }
    };
    match services.invoice(id).await {
        Ok(Some(invoice)) => Json(dto::InvoiceDto::from(&invoice)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "invoice_not_found",
            format!("invoice {id} not found"),
        ),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Single-invoice billing decision, exposed for manual and external
/// triggers. Strict: every decision failure maps to an error status.
pub async fn charge_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: InvoiceId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid invoice id")
        }
    };
    match services.decide(id).await {
        Ok(outcome) => Json(dto::ChargeResponseDto {
            invoice_id: id.value(),
            outcome: dto::outcome_str(outcome),
        })
        .into_response(),
        Err(e) => errors::billing_error_to_response(e),
    }
}
