use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::app::errors;
use crate::app::services::AppServices;

/// Liveness plus a datastore round-trip: reports the total number of
/// recorded sales, and fails when the store cannot be reached.
pub async fn health(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.sales.sale_count().await {
        Ok(total) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "orderflow-api",
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": Utc::now(),
                "totalSales": total,
            })),
        )
            .into_response(),
        Err(err) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            err.to_string(),
        ),
    }
}
