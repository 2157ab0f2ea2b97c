//! Per-entity lock registry with bounded-wait acquisition.
//!
//! Hands out one mutual-exclusion lock per product id and one per order id,
//! created lazily on first reference. Acquisition waits a bounded time and
//! surfaces a timeout as a conflict error instead of blocking indefinitely.
//!
//! The registry is owned by the coordinator, not a process-wide static.
//! Guards are scoped: dropping an [`EntityGuard`] releases the lock on
//! every exit path, including timeouts and early returns. An order's lock
//! entry may be retired once its saga completes; retirement only removes an
//! entry when the registry holds the sole reference to it, so a waiter that
//! already grabbed a handle keeps serializing against the same mutex.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use common::{OrderId, ProductId};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::timeout;

use crate::error::SagaError;

/// Default bounded wait for lock acquisition.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// A held per-entity lock; releases on drop.
#[derive(Debug)]
pub struct EntityGuard {
    _guard: OwnedMutexGuard<()>,
}

#[derive(Debug)]
struct LockTable<K> {
    entries: StdMutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for LockTable<K> {
    fn default() -> Self {
        Self {
            entries: StdMutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Copy> LockTable<K> {
    /// Returns a handle to the entity's mutex, creating it on first use.
    fn handle(&self, key: K) -> Arc<AsyncMutex<()>> {
        self.entries
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .clone()
    }

    /// Removes the entry if nothing else holds a handle to it.
    ///
    /// Returns true when the entry was removed. A live guard or waiter keeps
    /// the strong count above one, in which case the entry stays.
    fn retire(&self, key: K) -> bool {
        let mut entries = self.entries.lock().unwrap();
        if let Some(lock) = entries.get(&key)
            && Arc::strong_count(lock) == 1
        {
            entries.remove(&key);
            return true;
        }
        false
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// Registry of per-product and per-order locks.
#[derive(Debug)]
pub struct LockRegistry {
    acquire_timeout: Duration,
    products: LockTable<ProductId>,
    orders: LockTable<OrderId>,
}

impl LockRegistry {
    /// Creates a registry with the given acquisition timeout.
    pub fn new(acquire_timeout: Duration) -> Self {
        Self {
            acquire_timeout,
            products: LockTable::default(),
            orders: LockTable::default(),
        }
    }

    async fn acquire(
        &self,
        lock: Arc<AsyncMutex<()>>,
        entity: impl Fn() -> String,
    ) -> Result<EntityGuard, SagaError> {
        match timeout(self.acquire_timeout, lock.lock_owned()).await {
            Ok(guard) => Ok(EntityGuard { _guard: guard }),
            Err(_) => Err(SagaError::LockTimeout { entity: entity() }),
        }
    }

    /// Acquires the lock for a single product with a bounded wait.
    pub async fn lock_product(&self, product_id: ProductId) -> Result<EntityGuard, SagaError> {
        let lock = self.products.handle(product_id);
        self.acquire(lock, || format!("product {product_id}")).await
    }

    /// Acquires locks for a set of products in sorted, deduplicated order.
    ///
    /// Sorting by product id gives every caller the same acquisition order,
    /// so two sagas referencing the same products in a different submission
    /// order cannot deadlock against each other.
    pub async fn lock_products(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<EntityGuard>, SagaError> {
        let mut ids: Vec<ProductId> = product_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.lock_product(id).await?);
        }
        Ok(guards)
    }

    /// Acquires the lock for an order with a bounded wait.
    pub async fn lock_order(&self, order_id: OrderId) -> Result<EntityGuard, SagaError> {
        let lock = self.orders.handle(order_id);
        self.acquire(lock, || format!("order {order_id}")).await
    }

    /// Retires an order's lock entry once its saga has completed.
    ///
    /// Returns true when the entry was removed; false when another holder
    /// still references it, in which case the entry is left for a later
    /// retire attempt.
    pub fn retire_order(&self, order_id: OrderId) -> bool {
        self.orders.retire(order_id)
    }

    /// Number of live product lock entries.
    pub fn product_lock_count(&self) -> usize {
        self.products.len()
    }

    /// Number of live order lock entries.
    pub fn order_lock_count(&self) -> usize {
        self.orders.len()
    }
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ACQUIRE_TIMEOUT)
    }
}
