use axum::Router;

pub mod sales;
pub mod system;

pub fn router() -> Router {
    sales::router()
}
