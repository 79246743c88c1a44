//! Router assembly.

use std::sync::Arc;

use axum::extract::Extension;
use axum::routing::get;
use axum::Router;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full application router.
///
/// All handlers receive the shared [`AppServices`] via an `Extension`
/// layer; nothing else is injected.
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/v1/invoices", routes::invoices::router())
        .nest("/v1/customers", routes::customers::router())
        .nest("/v1/billing", routes::billing::router())
        .layer(Extension(services))
}
