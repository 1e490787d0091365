use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use orderflow_core::{CustomerId, ProductId, SaleId};
use orderflow_sales::LineItemRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/sales", sales_router())
}

fn sales_router() -> Router {
    Router::new()
        .route("/", post(create_sale).get(list_sales))
        .route("/:id", get(get_sale))
}

pub async fn create_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateSaleRequest>,
) -> axum::response::Response {
    let mut items: Vec<LineItemRequest> = body
        .items
        .iter()
        .map(|item| LineItemRequest {
            product_id: ProductId::new(item.product_id),
            quantity: item.quantity,
        })
        .collect();

    // Recognized request-shaping policy; see AppConfig. A request left empty
    // by the filter is rejected as empty by the service.
    if services.drop_non_positive_quantities {
        items.retain(|item| item.quantity > 0);
    }

    match services
        .sales
        .create_sale(CustomerId::new(body.customer_id), items)
        .await
    {
        Ok(sale) => (StatusCode::CREATED, Json(dto::sale_to_json(&sale))).into_response(),
        Err(err) => errors::sale_error_to_response(err),
    }
}

pub async fn get_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SaleId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid sale id");
        }
    };

    match services.sales.get_sale(id).await {
        Ok(Some(sale)) => (StatusCode::OK, Json(dto::sale_to_json(&sale))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "sale not found"),
        Err(err) => errors::sale_error_to_response(err),
    }
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.sales.list_sales().await {
        Ok(sales) => {
            let items = sales.iter().map(dto::sale_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(err) => errors::sale_error_to_response(err),
    }
}
