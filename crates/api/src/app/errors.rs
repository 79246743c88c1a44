//! Error-to-HTTP mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use billrun_billing::{BillingError, StoreError};

pub fn billing_error_to_response(err: BillingError) -> axum::response::Response {
    match &err {
        BillingError::InvoiceNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "invoice_not_found", err.to_string())
        }
        BillingError::CustomerNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "customer_not_found", err.to_string())
        }
        BillingError::CurrencyMismatch { .. } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "currency_mismatch",
            err.to_string(),
        ),
        BillingError::Network(_) => {
            json_error(StatusCode::BAD_GATEWAY, "gateway_network_error", err.to_string())
        }
        BillingError::Store(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use billrun_core::{CustomerId, InvoiceId};

    use super::*;

    #[test]
    fn not_found_kinds_map_to_404() {
        let resp = billing_error_to_response(BillingError::InvoiceNotFound(InvoiceId::new(404)));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = billing_error_to_response(BillingError::CustomerNotFound(CustomerId::new(55)));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn currency_mismatch_maps_to_422() {
        let resp = billing_error_to_response(BillingError::CurrencyMismatch {
            invoice_id: InvoiceId::new(4),
            customer_id: CustomerId::new(44),
        });
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn network_failure_maps_to_502() {
        let resp = billing_error_to_response(BillingError::Network("timeout".into()));
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn store_failure_maps_to_500() {
        let resp =
            billing_error_to_response(BillingError::Store(StoreError::backend("pool closed")));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
