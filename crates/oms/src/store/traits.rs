//! OrderStore trait definition

use crate::error::OmsError;
use crate::types::{Order, OrderUpdate};
use async_trait::async_trait;
use uuid::Uuid;

/// OrderStore trait - defines the interface for order storage
///
/// This trait allows different storage implementations (in-memory,
/// PostgreSQL) to be swapped without changing the execution logic.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order
    ///
    /// # Returns
    /// The stored order.
    async fn create(&self, order: Order) -> OmsResult<Order>;

    /// Load an order by ID
    ///
    /// # Errors
    /// Returns [`OmsError::NotFound`] when no such order exists.
    async fn find_by_id(&self, order_id: Uuid) -> OmsResult<Order>;

    /// Apply a partial update to an order
    ///
    /// Only the fields set in `update` are written; `updated_at` is always
    /// bumped.
    ///
    /// # Errors
    /// Returns [`OmsError::NotFound`] when no such order exists.
    async fn update_by_id(&self, order_id: Uuid, update: OrderUpdate) -> OmsResult<Order>;
}

/// Result type for OrderStore operations
pub type OmsResult<T> = std::result::Result<T, OmsError>;
