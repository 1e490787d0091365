//! In-memory order store for tests/dev.

use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use orderflow_core::SaleId;
use orderflow_sales::{NewSale, OrderStore, PersistedSale, SaleStatus, StoreError};

/// In-memory `OrderStore`.
///
/// Ids are assigned from a process-local counter, mirroring the database's
/// auto-increment behavior; inserts append, so reverse insertion order is
/// most-recent-first.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    inner: RwLock<Vec<PersistedSale>>,
    next_id: AtomicI64,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, sale: NewSale) -> Result<PersistedSale, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let persisted = PersistedSale {
            id: SaleId::new(id),
            customer_id: sale.customer_id,
            line_items: sale.line_items,
            grand_total: sale.grand_total,
            created_at: Utc::now(),
            status: SaleStatus::Completed,
        };

        let mut sales = self.inner.write().map_err(|_| poisoned())?;
        sales.push(persisted.clone());
        Ok(persisted)
    }

    async fn get(&self, id: SaleId) -> Result<Option<PersistedSale>, StoreError> {
        let sales = self.inner.read().map_err(|_| poisoned())?;
        Ok(sales.iter().find(|sale| sale.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<PersistedSale>, StoreError> {
        let sales = self.inner.read().map_err(|_| poisoned())?;
        Ok(sales.iter().rev().cloned().collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let sales = self.inner.read().map_err(|_| poisoned())?;
        Ok(sales.len() as u64)
    }
}
