use serde::Deserialize;
use serde_json::json;

use orderflow_sales::{CustomerSummary, Sale, ValidatedLineItem};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub customer_id: i64,
    pub items: Vec<LineItemDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDto {
    pub product_id: i64,
    pub quantity: i64,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn sale_to_json(sale: &Sale) -> serde_json::Value {
    json!({
        "id": sale.id,
        "customerId": sale.customer_id,
        "lineItems": sale.line_items.iter().map(line_to_json).collect::<Vec<_>>(),
        "grandTotal": sale.grand_total,
        "createdAt": sale.created_at,
        "status": sale.status,
        "customer": sale.customer.as_ref().map(customer_to_json),
    })
}

fn line_to_json(line: &ValidatedLineItem) -> serde_json::Value {
    json!({
        "productId": line.product_id,
        "productName": line.product_name,
        "quantity": line.quantity,
        "unitPrice": line.unit_price,
        "lineTotal": line.line_total,
    })
}

fn customer_to_json(customer: &CustomerSummary) -> serde_json::Value {
    json!({
        "id": customer.id,
        "name": customer.name,
    })
}
