//! Black-box tests: real HTTP against the production router, backed by stub
//! collaborator services and the in-memory store.

use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode as AxumStatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use reqwest::StatusCode;
use serde_json::{Value, json};

use orderflow_api::app;
use orderflow_api::config::{AppConfig, StoreBackend};

struct StubService {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    shutdown: std::sync::Arc<tokio::sync::Notify>,
}

impl StubService {
    async fn spawn(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let shutdown = std::sync::Arc::new(tokio::sync::Notify::new());
        let signal = shutdown.clone();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { signal.notified().await })
                .await
                .unwrap();
        });
        Self {
            base_url: format!("http://{addr}"),
            handle,
            shutdown,
        }
    }

    /// Kill the stub so the port starts refusing connections.
    ///
    /// A graceful shutdown (rather than aborting the accept loop) is required
    /// so that already-accepted keep-alive connections are closed too —
    /// aborting the server task leaves the detached per-connection tasks alive,
    /// which would keep answering pooled client connections.
    async fn shut_down(&self) {
        self.shutdown.notify_waiters();
        // Let the server task observe the signal, close idle keep-alive
        // connections, and release the listening socket.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

impl Drop for StubService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Customer directory stub: only customer 7 exists.
fn directory_router() -> Router {
    Router::new().route(
        "/customers/:id",
        get(|Path(id): Path<i64>| async move {
            if id == 7 {
                axum::Json(json!({
                    "success": true,
                    "data": {"id": 7, "name": "Joana", "email": "joana@example.com"}
                }))
                .into_response()
            } else {
                (
                    AxumStatusCode::NOT_FOUND,
                    axum::Json(json!({"success": false, "message": "customer not found"})),
                )
                    .into_response()
            }
        }),
    )
}

/// Product catalog stub: products 1 (10.00) and 2 (5.50) exist.
fn catalog_router() -> Router {
    Router::new().route(
        "/products/:id",
        get(|Path(id): Path<i64>| async move {
            let product = match id {
                1 => Some(("Notebook", 10.00)),
                2 => Some(("Wireless Mouse", 5.50)),
                _ => None,
            };
            match product {
                Some((name, price)) => axum::Json(json!({
                    "success": true,
                    "data": {"id": id, "name": name, "price": price}
                }))
                .into_response(),
                None => (
                    AxumStatusCode::NOT_FOUND,
                    axum::Json(json!({"success": false, "message": "product not found"})),
                )
                    .into_response(),
            }
        }),
    )
}

struct TestServer {
    base_url: String,
    directory: StubService,
    _catalog: StubService,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    async fn spawn_with(drop_non_positive_quantities: bool) -> Self {
        let directory = StubService::spawn(directory_router()).await;
        let catalog = StubService::spawn(catalog_router()).await;

        let config = AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            customers_url: directory.base_url.clone(),
            products_url: catalog.base_url.clone(),
            lookup_timeout: Duration::from_secs(1),
            store: StoreBackend::Memory,
            drop_non_positive_quantities,
        };

        // Same router as prod, bound to an ephemeral port.
        let app = app::build_app(&config).await.unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            directory,
            _catalog: catalog,
            handle,
        }
    }

    async fn create_sale(&self, client: &reqwest::Client, body: Value) -> reqwest::Response {
        client
            .post(format!("{}/sales", self.base_url))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn total_sales(&self, client: &reqwest::Client) -> u64 {
        let health: Value = client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        health["totalSales"].as_u64().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn records_a_sale_with_exact_totals() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = srv
        .create_sale(
            &client,
            json!({
                "customerId": 7,
                "items": [
                    {"productId": 1, "quantity": 2},
                    {"productId": 2, "quantity": 3},
                ]
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let sale: Value = res.json().await.unwrap();

    assert_eq!(sale["customerId"], json!(7));
    assert_eq!(sale["grandTotal"], json!(36.5));
    assert_eq!(sale["status"], json!("completed"));
    assert_eq!(sale["customer"]["name"], json!("Joana"));
    assert!(sale["createdAt"].is_string());

    let items = sale["lineItems"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["productId"], json!(1));
    assert_eq!(items[0]["productName"], json!("Notebook"));
    assert_eq!(items[0]["unitPrice"], json!(10.0));
    assert_eq!(items[0]["lineTotal"], json!(20.0));
    assert_eq!(items[1]["lineTotal"], json!(16.5));

    // The persisted record reads back identically.
    let id = sale["id"].as_i64().unwrap();
    let fetched: Value = client
        .get(format!("{}/sales/{}", srv.base_url, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["grandTotal"], json!(36.5));
    assert_eq!(fetched["lineItems"], sale["lineItems"]);

    assert_eq!(srv.total_sales(&client).await, 1);
}

#[tokio::test]
async fn unknown_customer_is_rejected_with_zero_writes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = srv
        .create_sale(
            &client,
            json!({"customerId": 999, "items": [{"productId": 1, "quantity": 1}]}),
        )
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("customer_not_found"));

    assert_eq!(srv.total_sales(&client).await, 0);
}

#[tokio::test]
async fn one_unknown_product_rejects_the_whole_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = srv
        .create_sale(
            &client,
            json!({
                "customerId": 7,
                "items": [
                    {"productId": 1, "quantity": 2},
                    {"productId": 999, "quantity": 1},
                ]
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("product_not_found"));
    assert!(body["message"].as_str().unwrap().contains("999"));

    assert_eq!(srv.total_sales(&client).await, 0);
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = srv
        .create_sale(
            &client,
            json!({"customerId": 7, "items": [{"productId": 1, "quantity": 0}]}),
        )
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("invalid_quantity"));
}

#[tokio::test]
async fn empty_item_list_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = srv
        .create_sale(&client, json!({"customerId": 7, "items": []}))
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("empty_request"));
}

#[tokio::test]
async fn unknown_sale_id_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/sales/42", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/sales/not-a-number", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reads_survive_a_directory_outage() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = srv
        .create_sale(
            &client,
            json!({"customerId": 7, "items": [{"productId": 1, "quantity": 2}]}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let sale: Value = res.json().await.unwrap();
    let id = sale["id"].as_i64().unwrap();

    srv.directory.shut_down().await;

    let listed: Value = client
        .get(format!("{}/sales", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = listed["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["customer"], Value::Null);
    assert_eq!(items[0]["grandTotal"], json!(20.0));

    let fetched: Value = client
        .get(format!("{}/sales/{}", srv.base_url, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["customer"], Value::Null);
}

#[tokio::test]
async fn drop_policy_filters_non_positive_entries() {
    let srv = TestServer::spawn_with(true).await;
    let client = reqwest::Client::new();

    let res = srv
        .create_sale(
            &client,
            json!({
                "customerId": 7,
                "items": [
                    {"productId": 1, "quantity": 0},
                    {"productId": 2, "quantity": 3},
                ]
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let sale: Value = res.json().await.unwrap();
    assert_eq!(sale["lineItems"].as_array().unwrap().len(), 1);
    assert_eq!(sale["grandTotal"], json!(16.5));
}

#[tokio::test]
async fn drop_policy_still_rejects_a_fully_filtered_request() {
    let srv = TestServer::spawn_with(true).await;
    let client = reqwest::Client::new();

    let res = srv
        .create_sale(
            &client,
            json!({"customerId": 7, "items": [{"productId": 1, "quantity": -1}]}),
        )
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("empty_request"));
}
