use std::sync::Arc;

use orderflow_clients::{CatalogClient, DirectoryClient};
use orderflow_sales::{OrderStore, SaleService};
use orderflow_store::{InMemoryOrderStore, PostgresOrderStore};

use crate::config::{AppConfig, StoreBackend};

/// Wired application services, shared with the handlers via `Extension`.
pub struct AppServices {
    pub sales: SaleService,
    /// See `AppConfig::drop_non_positive_quantities`.
    pub drop_non_positive_quantities: bool,
}

/// Wire the lookup clients, the order store, and the sale service from
/// configuration.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let directory = Arc::new(DirectoryClient::new(
        config.customers_url.clone(),
        config.lookup_timeout,
    )?);
    let catalog = Arc::new(CatalogClient::new(
        config.products_url.clone(),
        config.lookup_timeout,
    )?);

    let store: Arc<dyn OrderStore> = match &config.store {
        StoreBackend::Memory => Arc::new(InMemoryOrderStore::new()),
        StoreBackend::Postgres { database_url } => {
            let store = PostgresOrderStore::connect(database_url).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
    };

    tracing::info!(
        customers_url = %config.customers_url,
        products_url = %config.products_url,
        store = ?store_kind(&config.store),
        "services wired"
    );

    Ok(AppServices {
        sales: SaleService::new(directory, catalog, store),
        drop_non_positive_quantities: config.drop_non_positive_quantities,
    })
}

fn store_kind(store: &StoreBackend) -> &'static str {
    match store {
        StoreBackend::Memory => "memory",
        StoreBackend::Postgres { .. } => "postgres",
    }
}
