//! Saga coordinator for the order lifecycle.

use std::time::Duration;

use common::{OrderId, ProductId, UserId};
use domain::{Money, Order, OrderItem, OrderStatus};
use store::{InventoryStore, OrderStore};

use crate::clients::{AccountClient, WalletAction, WalletClient};
use crate::compensation::{Compensation, CompensationLog};
use crate::error::SagaError;
use crate::lock::{LockRegistry, DEFAULT_ACQUIRE_TIMEOUT};
use crate::retry::{with_retry, RetryPolicy};

/// Orchestrates the order create / cancel / deliver workflows.
///
/// Each workflow acquires the necessary per-entity locks, calls the account
/// and wallet clients and the inventory and order stores in a fixed order,
/// and on any step's failure walks back through the already-completed steps
/// issuing their inverse before reporting the original error.
pub struct SagaCoordinator<I, O, A, W>
where
    I: InventoryStore,
    O: OrderStore,
    A: AccountClient,
    W: WalletClient,
{
    inventory: I,
    orders: O,
    account: A,
    wallet: W,
    locks: LockRegistry,
    retry: RetryPolicy,
}

impl<I, O, A, W> SagaCoordinator<I, O, A, W>
where
    I: InventoryStore,
    O: OrderStore,
    A: AccountClient,
    W: WalletClient,
{
    /// Creates a coordinator with the default retry policy and lock timeout.
    pub fn new(inventory: I, orders: O, account: A, wallet: W) -> Self {
        Self::with_policies(
            inventory,
            orders,
            account,
            wallet,
            RetryPolicy::default(),
            DEFAULT_ACQUIRE_TIMEOUT,
        )
    }

    /// Creates a coordinator with explicit retry and lock-wait tuning.
    pub fn with_policies(
        inventory: I,
        orders: O,
        account: A,
        wallet: W,
        retry: RetryPolicy,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            inventory,
            orders,
            account,
            wallet,
            locks: LockRegistry::new(lock_timeout),
            retry,
        }
    }

    /// Returns the coordinator's lock registry.
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    /// Runs the order creation saga.
    ///
    /// Either produces a persisted order in status `PLACED` with a correctly
    /// computed total, or fails with no durable side effect surviving past
    /// the reported error.
    #[tracing::instrument(skip(self, items), fields(user_id = %user_id))]
    pub async fn create_order(
        &self,
        user_id: UserId,
        items: Vec<OrderItem>,
    ) -> Result<Order, SagaError> {
        metrics::counter!("saga_executions_total").increment(1);
        let saga_start = std::time::Instant::now();

        // 1. Validate before any lock is taken or remote call made.
        Order::validate_items(&items)?;

        // 2. Fetch the user's discount flag; unknown user is a rejection,
        //    not a saga failure.
        let profile = with_retry(self.retry, "account", || self.account.fetch_user(user_id)).await?;

        // 3. Price and stock-check under the product locks. Locks are held
        //    only for the read-and-check, not for the rest of the saga.
        let product_ids: Vec<ProductId> = items.iter().map(|i| i.product_id).collect();
        let mut total = Money::zero();
        {
            let _guards = self.locks.lock_products(&product_ids).await?;
            for item in &items {
                let product = self.inventory.get(item.product_id).await?;
                if item.quantity > product.stock {
                    return Err(SagaError::OutOfStock {
                        product_id: item.product_id,
                        available: product.stock,
                        requested: item.quantity,
                    });
                }
                total += product.price.multiply(item.quantity);
            }
        }

        // 4. One-time discount: applies only while the flag is still false.
        if !profile.discount_used {
            total = total.discounted();
        }

        // 5-8. Mutating steps; completed inverses accumulate in the log.
        let mut log = CompensationLog::new();
        match self
            .run_creation_steps(user_id, &items, total, profile.discount_used, &mut log)
            .await
        {
            Ok(order) => {
                metrics::histogram!("saga_duration_seconds")
                    .record(saga_start.elapsed().as_secs_f64());
                metrics::counter!("saga_completed").increment(1);
                tracing::info!(order_id = %order.id, total = %order.total_price, "order placed");
                Ok(order)
            }
            Err(err) => {
                self.run_compensations(log, &err).await;
                metrics::histogram!("saga_duration_seconds")
                    .record(saga_start.elapsed().as_secs_f64());
                metrics::counter!("saga_failed").increment(1);
                Err(err)
            }
        }
    }

    /// Forward steps 5-8 of the creation saga.
    async fn run_creation_steps(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        discount_already_used: bool,
        log: &mut CompensationLog,
    ) -> Result<Order, SagaError> {
        // 5. Debit the wallet. Nothing to compensate if this rejects.
        with_retry(self.retry, "wallet", || {
            self.wallet.adjust(user_id, WalletAction::Debit, total)
        })
        .await?;
        log.record(Compensation::CreditWallet {
            user_id,
            amount: total,
        });

        // 6. Consume the discount. Idempotent on the account side; the
        //    inverse is only recorded when this saga actually spent it.
        with_retry(self.retry, "account", || {
            self.account.set_discount_used(user_id)
        })
        .await?;
        if !discount_already_used {
            log.record(Compensation::ResetDiscount { user_id });
        }

        // 7. Reserve stock item by item, each decrement under its product
        //    lock. The store decrement is conditional: stock never goes
        //    negative even if it moved since the pricing check.
        for item in items {
            let guard = self.locks.lock_product(item.product_id).await?;
            let reserved = self
                .inventory
                .adjust_stock(item.product_id, -i64::from(item.quantity))
                .await;
            drop(guard);
            reserved?;
            log.record(Compensation::RestoreStock {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }

        // 8. Persist the order as PLACED.
        let order = self.orders.create(user_id, total, items.to_vec()).await?;
        Ok(order)
    }

    /// Runs the order cancellation saga.
    ///
    /// Transitions a `PLACED` order to `CANCELLED`, restoring stock and
    /// crediting the wallet; any other starting status is rejected without
    /// side effects.
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order, SagaError> {
        metrics::counter!("saga_executions_total").increment(1);
        let saga_start = std::time::Instant::now();

        let order_guard = self.locks.lock_order(order_id).await?;
        let order = self.orders.get(order_id).await?;
        order.check_transition(OrderStatus::Cancelling)?;

        // Transient marker fences off a concurrent cancel or deliver.
        self.orders
            .update_status(order_id, OrderStatus::Cancelling)
            .await?;

        let mut log = CompensationLog::new();
        match self.run_cancellation_steps(&order, &mut log).await {
            Ok(()) => {
                let cancelled = self.orders.get(order_id).await?;
                drop(order_guard);
                self.locks.retire_order(order_id);
                metrics::histogram!("saga_duration_seconds")
                    .record(saga_start.elapsed().as_secs_f64());
                metrics::counter!("saga_completed").increment(1);
                tracing::info!(order_id = %order_id, "order cancelled");
                Ok(cancelled)
            }
            Err(err) => {
                self.run_compensations(log, &err).await;
                if let Err(revert_err) = self
                    .orders
                    .update_status(order_id, OrderStatus::Placed)
                    .await
                {
                    tracing::error!(
                        order_id = %order_id,
                        error = %revert_err,
                        "failed to revert order to PLACED after cancellation failure"
                    );
                }
                metrics::histogram!("saga_duration_seconds")
                    .record(saga_start.elapsed().as_secs_f64());
                metrics::counter!("saga_failed").increment(1);
                Err(err)
            }
        }
    }

    /// Forward steps of the cancellation saga, from the `CANCELLING` marker
    /// through the final `CANCELLED` write.
    async fn run_cancellation_steps(
        &self,
        order: &Order,
        log: &mut CompensationLog,
    ) -> Result<(), SagaError> {
        // Restore stock per item under its product lock.
        for item in &order.items {
            let guard = self.locks.lock_product(item.product_id).await?;
            let restored = self
                .inventory
                .adjust_stock(item.product_id, i64::from(item.quantity))
                .await;
            drop(guard);
            restored?;
            log.record(Compensation::ReclaimStock {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }

        // Credit the wallet for the order's total.
        with_retry(self.retry, "wallet", || {
            self.wallet
                .adjust(order.user_id, WalletAction::Credit, order.total_price)
        })
        .await?;
        log.record(Compensation::DebitWallet {
            user_id: order.user_id,
            amount: order.total_price,
        });

        self.orders
            .update_status(order.id, OrderStatus::Cancelled)
            .await?;
        Ok(())
    }

    /// Runs the order delivery transition.
    ///
    /// Moves a `PLACED` order through `DELIVERING` to `DELIVERED` under the
    /// order's lock. Any other current status is rejected without mutation.
    /// The only workflow with no compensating logic: there are no external
    /// side effects beyond the status field.
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    pub async fn deliver_order(&self, order_id: OrderId) -> Result<Order, SagaError> {
        metrics::counter!("saga_executions_total").increment(1);

        let order_guard = self.locks.lock_order(order_id).await?;
        let order = self.orders.get(order_id).await?;
        order.check_transition(OrderStatus::Delivering)?;

        self.orders
            .update_status(order_id, OrderStatus::Delivering)
            .await?;
        if let Err(err) = self
            .orders
            .update_status(order_id, OrderStatus::Delivered)
            .await
        {
            if let Err(revert_err) = self
                .orders
                .update_status(order_id, OrderStatus::Placed)
                .await
            {
                tracing::error!(
                    order_id = %order_id,
                    error = %revert_err,
                    "failed to revert order to PLACED after delivery failure"
                );
            }
            metrics::counter!("saga_failed").increment(1);
            return Err(err.into());
        }

        let delivered = self.orders.get(order_id).await?;
        drop(order_guard);
        self.locks.retire_order(order_id);
        metrics::counter!("saga_completed").increment(1);
        tracing::info!(order_id = %order_id, "order delivered");
        Ok(delivered)
    }

    /// Replays a compensation log most-recent-first.
    ///
    /// Compensation failures are logged and counted, never raised: the
    /// original cause is what surfaces to the caller.
    #[tracing::instrument(skip(self, log), fields(steps = log.len()))]
    async fn run_compensations(&self, log: CompensationLog, cause: &SagaError) {
        if log.is_empty() {
            return;
        }
        metrics::counter!("saga_compensations_total").increment(1);
        tracing::warn!(%cause, steps = log.len(), "saga failed, compensating");

        for compensation in log.into_reverse_iter() {
            let outcome = match &compensation {
                Compensation::CreditWallet { user_id, amount } => {
                    with_retry(self.retry, "wallet", || {
                        self.wallet.adjust(*user_id, WalletAction::Credit, *amount)
                    })
                    .await
                    .map(|_| ())
                }
                Compensation::DebitWallet { user_id, amount } => {
                    with_retry(self.retry, "wallet", || {
                        self.wallet.adjust(*user_id, WalletAction::Debit, *amount)
                    })
                    .await
                    .map(|_| ())
                }
                Compensation::ResetDiscount { user_id } => {
                    with_retry(self.retry, "account", || {
                        self.account.reset_discount(*user_id)
                    })
                    .await
                }
                Compensation::RestoreStock {
                    product_id,
                    quantity,
                } => self
                    .inventory
                    .adjust_stock(*product_id, i64::from(*quantity))
                    .await
                    .map(|_| ())
                    .map_err(SagaError::from),
                Compensation::ReclaimStock {
                    product_id,
                    quantity,
                } => self
                    .inventory
                    .adjust_stock(*product_id, -i64::from(*quantity))
                    .await
                    .map(|_| ())
                    .map_err(SagaError::from),
            };

            if let Err(comp_err) = outcome {
                metrics::counter!("saga_compensation_failures").increment(1);
                tracing::warn!(
                    compensation = ?compensation,
                    error = %comp_err,
                    "compensation step failed"
                );
            }
        }
    }
}
