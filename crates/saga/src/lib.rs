//! Order lifecycle saga coordination.
//!
//! This crate orchestrates the multi-step order workflows across three
//! independently-owned resources: the account service's discount flag, the
//! wallet service's balance, and the local inventory. No single transaction
//! covers them, so each workflow is a saga: forward steps in a fixed order,
//! with compensating actions issued in reverse on any downstream failure.
//!
//! The order creation saga:
//! 1. Validate the payload
//! 2. Fetch the user's discount flag
//! 3. Price and stock-check under per-product locks
//! 4. Apply the one-time discount
//! 5. Debit the wallet
//! 6. Consume the discount flag
//! 7. Reserve stock per product
//! 8. Persist the order as `PLACED`
//!
//! Cancellation restores stock and credits the wallet under the order's
//! lock; delivery is a pure status transition. Lost updates on shared stock
//! and order status are prevented by the [`LockRegistry`]'s per-entity
//! locks, acquired with a bounded wait.

pub mod clients;
pub mod compensation;
pub mod coordinator;
pub mod error;
pub mod lock;
pub mod retry;

pub use clients::{
    AccountClient, ClientError, InMemoryAccountClient, InMemoryWalletClient, UserProfile,
    WalletAction, WalletClient,
};
pub use compensation::{Compensation, CompensationLog};
pub use coordinator::SagaCoordinator;
pub use error::{ErrorKind, SagaError};
pub use lock::{EntityGuard, LockRegistry};
pub use retry::{with_retry, RetryPolicy};
