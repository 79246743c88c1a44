use std::sync::Arc;

use axum::{extract::Extension, routing::post, Json, Router};

use crate::app::dto::RunReportDto;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/run", post(run_billing))
}

/// Trigger a billing pass now.
///
/// Always 200: the pass itself never fails, per-invoice problems are
/// entries on the returned report.
pub async fn run_billing(
    Extension(services): Extension<Arc<AppServices>>,
) -> Json<RunReportDto> {
    let report = services.run_all().await;
    Json(RunReportDto::from(&report))
}
