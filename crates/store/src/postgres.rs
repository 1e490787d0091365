//! Postgres-backed order store.
//!
//! Sales are written as a header row plus one row per line item, in a single
//! transaction: either the whole sale becomes durable or none of it does. The
//! database assigns the id (`BIGSERIAL`) and the creation timestamp.
//!
//! Sqlx errors map to `StoreError` as follows: pool/connection-level failures
//! (`PoolTimedOut`, `PoolClosed`, `Io`, `Tls`) become `Unavailable`;
//! everything else becomes `Query`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use orderflow_core::{CustomerId, ProductId, SaleId};
use orderflow_sales::{
    NewSale, OrderStore, PersistedSale, SaleStatus, StoreError, ValidatedLineItem,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sales (
    id           BIGSERIAL PRIMARY KEY,
    customer_id  BIGINT NOT NULL,
    grand_total  NUMERIC(14, 2) NOT NULL,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    status       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sale_line_items (
    sale_id      BIGINT NOT NULL REFERENCES sales(id),
    line_no      INT NOT NULL,
    product_id   BIGINT NOT NULL,
    product_name TEXT NOT NULL,
    quantity     BIGINT NOT NULL,
    unit_price   NUMERIC(14, 2) NOT NULL,
    line_total   NUMERIC(14, 2) NOT NULL,
    PRIMARY KEY (sale_id, line_no)
);
"#;

/// Postgres `OrderStore`.
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with a small pool and a bounded acquire timeout.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the two tables if they do not exist yet. There is no migration
    /// tooling; the schema is additive-only.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn lines_for(&self, sale_id: SaleId) -> Result<Vec<ValidatedLineItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, product_name, quantity, unit_price, line_total
            FROM sale_line_items
            WHERE sale_id = $1
            ORDER BY line_no ASC
            "#,
        )
        .bind(sale_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("lines_for", e))?;

        rows.iter().map(line_from_row).collect()
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[tracing::instrument(skip(self, sale), fields(customer_id = %sale.customer_id))]
    async fn insert(&self, sale: NewSale) -> Result<PersistedSale, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert.begin", e))?;

        let header = sqlx::query(
            r#"
            INSERT INTO sales (customer_id, grand_total, status)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(sale.customer_id.as_i64())
        .bind(sale.grand_total)
        .bind(status_as_str(SaleStatus::Completed))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert.header", e))?;

        let id: i64 = header
            .try_get("id")
            .map_err(|e| map_sqlx_error("insert.header", e))?;
        let created_at: DateTime<Utc> = header
            .try_get("created_at")
            .map_err(|e| map_sqlx_error("insert.header", e))?;

        for (line_no, line) in sale.line_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_line_items
                    (sale_id, line_no, product_id, product_name, quantity, unit_price, line_total)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(id)
            .bind(line_no as i32 + 1)
            .bind(line.product_id.as_i64())
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.line_total)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert.line", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("insert.commit", e))?;

        Ok(PersistedSale {
            id: SaleId::new(id),
            customer_id: sale.customer_id,
            line_items: sale.line_items,
            grand_total: sale.grand_total,
            created_at,
            status: SaleStatus::Completed,
        })
    }

    #[tracing::instrument(skip(self), fields(sale_id = %id))]
    async fn get(&self, id: SaleId) -> Result<Option<PersistedSale>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_id, grand_total, created_at, status
            FROM sales
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        let Some(row) = row else { return Ok(None) };

        let mut sale = header_from_row(&row)?;
        sale.line_items = self.lines_for(sale.id).await?;
        Ok(Some(sale))
    }

    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<PersistedSale>, StoreError> {
        let headers = sqlx::query(
            r#"
            SELECT id, customer_id, grand_total, created_at, status
            FROM sales
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_all", e))?;

        let line_rows = sqlx::query(
            r#"
            SELECT sale_id, product_id, product_name, quantity, unit_price, line_total
            FROM sale_line_items
            ORDER BY sale_id, line_no ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_all.lines", e))?;

        let mut lines_by_sale: HashMap<i64, Vec<ValidatedLineItem>> = HashMap::new();
        for row in &line_rows {
            let sale_id: i64 = row
                .try_get("sale_id")
                .map_err(|e| map_sqlx_error("list_all.lines", e))?;
            lines_by_sale
                .entry(sale_id)
                .or_default()
                .push(line_from_row(row)?);
        }

        let mut sales = Vec::with_capacity(headers.len());
        for row in &headers {
            let mut sale = header_from_row(row)?;
            sale.line_items = lines_by_sale.remove(&sale.id.as_i64()).unwrap_or_default();
            sales.push(sale);
        }
        Ok(sales)
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM sales")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;
        let total: i64 = row
            .try_get("total")
            .map_err(|e| map_sqlx_error("count", e))?;
        Ok(total as u64)
    }
}

fn header_from_row(row: &sqlx::postgres::PgRow) -> Result<PersistedSale, StoreError> {
    let id: i64 = row.try_get("id").map_err(decode)?;
    let customer_id: i64 = row.try_get("customer_id").map_err(decode)?;
    let grand_total: Decimal = row.try_get("grand_total").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let status: String = row.try_get("status").map_err(decode)?;

    Ok(PersistedSale {
        id: SaleId::new(id),
        customer_id: CustomerId::new(customer_id),
        line_items: Vec::new(),
        grand_total,
        created_at,
        status: status_from_str(&status)?,
    })
}

fn line_from_row(row: &sqlx::postgres::PgRow) -> Result<ValidatedLineItem, StoreError> {
    let product_id: i64 = row.try_get("product_id").map_err(decode)?;
    Ok(ValidatedLineItem {
        product_id: ProductId::new(product_id),
        product_name: row.try_get("product_name").map_err(decode)?,
        quantity: row.try_get("quantity").map_err(decode)?,
        unit_price: row.try_get("unit_price").map_err(decode)?,
        line_total: row.try_get("line_total").map_err(decode)?,
    })
}

fn status_as_str(status: SaleStatus) -> &'static str {
    match status {
        SaleStatus::Completed => "completed",
    }
}

fn status_from_str(raw: &str) -> Result<SaleStatus, StoreError> {
    match raw {
        "completed" => Ok(SaleStatus::Completed),
        other => Err(StoreError::Query(format!("unknown sale status {other:?}"))),
    }
}

fn decode(err: sqlx::Error) -> StoreError {
    StoreError::Query(format!("decode: {err}"))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(format!("{operation}: {err}")),
        other => StoreError::Query(format!("{operation}: {other}")),
    }
}
