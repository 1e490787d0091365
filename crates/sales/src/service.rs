use std::sync::Arc;

use orderflow_clients::{CustomerLookup, LookupError, ProductLookup};
use orderflow_core::{CustomerId, SaleId};

use crate::error::{Collaborator, SaleError};
use crate::sale::{CustomerSummary, LineItemRequest, Sale, ValidatedLineItem};
use crate::store::{NewSale, OrderStore};

/// Orchestrates the validate-aggregate-persist workflow.
///
/// Construction takes the two collaborator lookups and the order store as
/// explicit dependencies; there is no ambient configuration. Lookups run
/// sequentially (customer first, then one product per line item in request
/// order) and all of them must succeed before the store is touched.
pub struct SaleService {
    directory: Arc<dyn CustomerLookup>,
    catalog: Arc<dyn ProductLookup>,
    store: Arc<dyn OrderStore>,
}

impl SaleService {
    pub fn new(
        directory: Arc<dyn CustomerLookup>,
        catalog: Arc<dyn ProductLookup>,
        store: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            directory,
            catalog,
            store,
        }
    }

    /// Record a sale.
    ///
    /// All-or-nothing: any validation failure returns before the insert, so a
    /// rejected request leaves no trace in the store. There is no compensating
    /// rollback because nothing is written until validation fully succeeds.
    pub async fn create_sale(
        &self,
        customer_id: CustomerId,
        items: Vec<LineItemRequest>,
    ) -> Result<Sale, SaleError> {
        if items.is_empty() {
            return Err(SaleError::EmptyRequest);
        }

        let customer = match self.directory.customer(customer_id).await {
            Ok(customer) => customer,
            Err(LookupError::NotFound) => return Err(SaleError::CustomerNotFound),
            Err(LookupError::Unavailable(reason)) => {
                tracing::warn!(%customer_id, %reason, "customer directory unavailable");
                return Err(SaleError::CollaboratorUnavailable(Collaborator::Directory));
            }
        };

        let mut line_items = Vec::with_capacity(items.len());
        for item in &items {
            let product = match self.catalog.product(item.product_id).await {
                Ok(product) => product,
                Err(LookupError::NotFound) => {
                    return Err(SaleError::ProductNotFound(item.product_id));
                }
                Err(LookupError::Unavailable(reason)) => {
                    tracing::warn!(product_id = %item.product_id, %reason, "product catalog unavailable");
                    return Err(SaleError::CollaboratorUnavailable(Collaborator::Catalog));
                }
            };

            if item.quantity <= 0 {
                return Err(SaleError::InvalidQuantity {
                    product_id: item.product_id,
                    quantity: item.quantity,
                });
            }

            line_items.push(ValidatedLineItem::snapshot(&product, item.quantity));
        }

        let grand_total = line_items.iter().map(|line| line.line_total).sum();

        let persisted = self
            .store
            .insert(NewSale {
                customer_id,
                line_items,
                grand_total,
            })
            .await?;

        tracing::info!(sale_id = %persisted.id, %customer_id, %grand_total, "sale recorded");

        // Echo the freshly validated customer back in the creation response.
        Ok(Sale::from_persisted(persisted, Some(customer.into())))
    }

    /// Fetch one sale, attaching a best-effort customer summary.
    pub async fn get_sale(&self, id: SaleId) -> Result<Option<Sale>, SaleError> {
        let Some(persisted) = self.store.get(id).await? else {
            return Ok(None);
        };
        let customer = self.enrich(persisted.customer_id).await;
        Ok(Some(Sale::from_persisted(persisted, customer)))
    }

    /// All sales, most recent first, each with best-effort enrichment.
    pub async fn list_sales(&self) -> Result<Vec<Sale>, SaleError> {
        let persisted = self.store.list_all().await?;
        let mut sales = Vec::with_capacity(persisted.len());
        for sale in persisted {
            let customer = self.enrich(sale.customer_id).await;
            sales.push(Sale::from_persisted(sale, customer));
        }
        Ok(sales)
    }

    /// Total number of recorded sales.
    pub async fn sale_count(&self) -> Result<u64, SaleError> {
        Ok(self.store.count().await?)
    }

    /// Display enrichment never fails a read: any lookup error degrades to an
    /// absent customer.
    async fn enrich(&self, customer_id: CustomerId) -> Option<CustomerSummary> {
        match self.directory.customer(customer_id).await {
            Ok(customer) => Some(customer.into()),
            Err(err) => {
                tracing::warn!(%customer_id, error = %err, "customer enrichment degraded");
                None
            }
        }
    }
}
