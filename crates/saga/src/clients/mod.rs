//! Remote-call surfaces for the account and wallet services.

pub mod account;
pub mod wallet;

pub use account::{AccountClient, InMemoryAccountClient, UserProfile};
pub use wallet::{InMemoryWalletClient, WalletAction, WalletClient};

use common::UserId;
use domain::Money;
use thiserror::Error;

/// Errors reported by the remote service clients.
///
/// Transient service errors are retried by the coordinator's retry policy;
/// everything else is surfaced as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The remote side does not know the requested entity.
    #[error("{0}")]
    NotFound(String),

    /// The wallet rejected a debit for lack of funds.
    #[error("Insufficient balance for user {user_id}")]
    InsufficientBalance { user_id: UserId, requested: Money },

    /// The remote call failed; `transient` marks it as retryable.
    #[error("{reason}")]
    Service { reason: String, transient: bool },
}
