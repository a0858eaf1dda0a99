//! In-memory order store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::OmsError;
use crate::store::traits::{OmsResult, OrderStore};
use crate::types::{Order, OrderUpdate};

/// In-memory order store for testing and development
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderStore {
    /// Create a new in-memory order store
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored orders
    pub fn len(&self) -> usize {
        self.orders.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: Order) -> OmsResult<Order> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| OmsError::StorageError(e.to_string()))?;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, order_id: Uuid) -> OmsResult<Order> {
        let orders = self
            .orders
            .read()
            .map_err(|e| OmsError::StorageError(e.to_string()))?;
        orders
            .get(&order_id)
            .cloned()
            .ok_or(OmsError::NotFound(order_id))
    }

    async fn update_by_id(&self, order_id: Uuid, update: OrderUpdate) -> OmsResult<Order> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| OmsError::StorageError(e.to_string()))?;
        let order = orders
            .get_mut(&order_id)
            .ok_or(OmsError::NotFound(order_id))?;
        order.apply(&update);
        Ok(order.clone())
    }
}
