//! Order store trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Money, Order, OrderItem, OrderStatus};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::Result;

/// Order and line-item persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order in status `PLACED`, assigning the next order id.
    async fn create(&self, user_id: UserId, total_price: Money, items: Vec<OrderItem>)
        -> Result<Order>;

    /// Reads an order by id.
    async fn get(&self, order_id: OrderId) -> Result<Order>;

    /// Lists all orders placed by a user.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Lists every persisted order.
    async fn list(&self) -> Result<Vec<Order>>;

    /// Updates the status of an existing order.
    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<()>;
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: HashMap<OrderId, Order>,
    next_id: u64,
    fail_on_create: bool,
}

/// In-memory order store with monotonic id assignment.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail on create calls, for compensation tests.
    pub async fn set_fail_on_create(&self, fail: bool) {
        self.state.write().await.fail_on_create = fail;
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(
        &self,
        user_id: UserId,
        total_price: Money,
        items: Vec<OrderItem>,
    ) -> Result<Order> {
        let mut state = self.state.write().await;

        if state.fail_on_create {
            return Err(StoreError::Storage("injected create failure".to_string()));
        }

        state.next_id += 1;
        let order = Order {
            id: OrderId::new(state.next_id),
            user_id,
            total_price,
            status: OrderStatus::Placed,
            items,
        };
        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, order_id: OrderId) -> Result<Order> {
        self.state
            .read()
            .await
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(StoreError::OrderNotFound(order_id))
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<()> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or(StoreError::OrderNotFound(order_id))?;
        order.status = status;
        Ok(())
    }
}
