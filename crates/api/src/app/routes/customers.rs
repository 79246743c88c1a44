use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use billrun_core::CustomerId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers))
        .route("/:id", get(get_customer))
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.customers().await {
        Ok(customers) => {
            let body: Vec<dto::CustomerDto> =
                customers.iter().map(dto::CustomerDto::from).collect();
            Json(body).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
        }
    };
    match services.customer(id).await {
        Ok(Some(customer)) => Json(dto::CustomerDto::from(&customer)).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "customer_not_found",
            format!("customer {id} not found"),
        ),
        Err(e) => errors::store_error_to_response(e),
    }
}
