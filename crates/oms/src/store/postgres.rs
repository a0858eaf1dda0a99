//! PostgreSQL order store implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPool;
use sqlx::Row;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::OmsError;
use crate::store::traits::{OmsResult, OrderStore};
use crate::types::{Order, OrderUpdate};

/// DDL for the orders table.
///
/// The chosen venue persists under `selected_dex` for compatibility with
/// pre-existing deployments of this schema.
const CREATE_ORDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id UUID PRIMARY KEY,
    type TEXT NOT NULL,
    token_in TEXT NOT NULL,
    token_out TEXT NOT NULL,
    amount_in DOUBLE PRECISION NOT NULL,
    slippage DOUBLE PRECISION NOT NULL,
    status TEXT NOT NULL,
    selected_dex TEXT,
    tx_hash TEXT,
    failure_reason TEXT,
    executed_price DOUBLE PRECISION,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Create the orders table if it does not exist yet
pub async fn run_migrations(pool: &PgPool) -> OmsResult<()> {
    sqlx::query(CREATE_ORDERS_TABLE)
        .execute(pool)
        .await
        .map_err(|e| OmsError::StorageError(e.to_string()))?;
    tracing::info!("Orders table migration applied");
    Ok(())
}

/// PostgreSQL order store
pub struct PostgresOrderStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderStore {
    /// Create a new PostgreSQL order store
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    fn row_to_order(&self, row: &sqlx::postgres::PgRow) -> OmsResult<Order> {
        let order_type: String = row.get("type");
        let status: String = row.get("status");

        Ok(Order {
            id: row.get("id"),
            order_type: order_type
                .parse()
                .map_err(OmsError::StorageError)?,
            token_in: row.get("token_in"),
            token_out: row.get("token_out"),
            amount_in: row.get("amount_in"),
            slippage: row.get("slippage"),
            status: status.parse().map_err(OmsError::StorageError)?,
            selected_venue: row.get("selected_dex"),
            tx_hash: row.get("tx_hash"),
            executed_price: row.get("executed_price"),
            failure_reason: row.get("failure_reason"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create(&self, order: Order) -> OmsResult<Order> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, type, token_in, token_out, amount_in, slippage, status,
                selected_dex, tx_hash, failure_reason, executed_price,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(order.id)
        .bind(order.order_type.to_string())
        .bind(&order.token_in)
        .bind(&order.token_out)
        .bind(order.amount_in)
        .bind(order.slippage)
        .bind(order.status.to_string())
        .bind(&order.selected_venue)
        .bind(&order.tx_hash)
        .bind(&order.failure_reason)
        .bind(order.executed_price)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| OmsError::StorageError(e.to_string()))?;

        Ok(order)
    }

    async fn find_by_id(&self, order_id: Uuid) -> OmsResult<Order> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| OmsError::StorageError(e.to_string()))?;

        match row {
            Some(row) => self.row_to_order(&row),
            None => Err(OmsError::NotFound(order_id)),
        }
    }

    async fn update_by_id(&self, order_id: Uuid, update: OrderUpdate) -> OmsResult<Order> {
        // Unset fields fall back to the current column value
        let row = sqlx::query(
            r#"
            UPDATE orders SET
                status = COALESCE($2, status),
                selected_dex = COALESCE($3, selected_dex),
                tx_hash = COALESCE($4, tx_hash),
                executed_price = COALESCE($5, executed_price),
                failure_reason = COALESCE($6, failure_reason),
                updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(update.status.map(|s| s.to_string()))
        .bind(&update.selected_venue)
        .bind(&update.tx_hash)
        .bind(update.executed_price)
        .bind(&update.failure_reason)
        .bind(Utc::now())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| OmsError::StorageError(e.to_string()))?;

        match row {
            Some(row) => self.row_to_order(&row),
            None => Err(OmsError::NotFound(order_id)),
        }
    }
}
