use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use orderflow_sales::{Collaborator, SaleError};

/// Map a sale failure to a consistent JSON error response.
///
/// `CollaboratorUnavailable` is not distinguished at this boundary: it maps
/// onto the not-found response of the collaborator it came from. The
/// distinction stays visible in the logs.
pub fn sale_error_to_response(err: SaleError) -> axum::response::Response {
    match err {
        SaleError::EmptyRequest => {
            json_error(StatusCode::BAD_REQUEST, "empty_request", err.to_string())
        }
        SaleError::InvalidQuantity { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_quantity", err.to_string())
        }
        SaleError::CustomerNotFound
        | SaleError::CollaboratorUnavailable(Collaborator::Directory) => {
            json_error(StatusCode::NOT_FOUND, "customer_not_found", "customer not found")
        }
        SaleError::ProductNotFound(id) => json_error(
            StatusCode::NOT_FOUND,
            "product_not_found",
            format!("product {id} not found"),
        ),
        SaleError::CollaboratorUnavailable(Collaborator::Catalog) => {
            json_error(StatusCode::NOT_FOUND, "product_not_found", "product not found")
        }
        SaleError::Store(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            e.to_string(),
        ),
    }
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
