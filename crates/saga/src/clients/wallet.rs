//! Wallet service client: balance credits and debits.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;
use domain::Money;
use serde::{Deserialize, Serialize};

use super::ClientError;

/// Direction of a balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletAction {
    /// Add to the balance.
    Credit,
    /// Remove from the balance; rejected when funds are insufficient.
    Debit,
}

/// Remote call surface of the wallet service.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Adjusts a user's balance and returns the new balance.
    ///
    /// A debit exceeding the balance is rejected with
    /// [`ClientError::InsufficientBalance`]; the balance never goes negative.
    async fn adjust(
        &self,
        user_id: UserId,
        action: WalletAction,
        amount: Money,
    ) -> Result<Money, ClientError>;
}

#[derive(Debug, Default)]
struct InMemoryWalletState {
    balances: HashMap<UserId, i64>,
    transient_failures: u32,
    fail_on_credit: bool,
}

/// In-memory wallet client for tests and local runs.
///
/// Mirrors the wallet service's contract: a wallet is created with a zero
/// balance on first reference.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWalletClient {
    state: Arc<RwLock<InMemoryWalletState>>,
}

impl InMemoryWalletClient {
    /// Creates a new in-memory wallet client with no balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a user's balance outright.
    pub fn set_balance(&self, user_id: UserId, balance: Money) {
        self.state
            .write()
            .unwrap()
            .balances
            .insert(user_id, balance.minor());
    }

    /// Returns the user's current balance (zero for unseen users).
    pub fn balance(&self, user_id: UserId) -> Money {
        Money::from_minor(
            self.state
                .read()
                .unwrap()
                .balances
                .get(&user_id)
                .copied()
                .unwrap_or(0),
        )
    }

    /// Makes the next `n` adjust calls fail with a transient error.
    pub fn inject_transient_failures(&self, n: u32) {
        self.state.write().unwrap().transient_failures = n;
    }

    /// Configures the client to fail hard on credit calls, for
    /// cancellation-compensation tests.
    pub fn set_fail_on_credit(&self, fail: bool) {
        self.state.write().unwrap().fail_on_credit = fail;
    }
}

#[async_trait]
impl WalletClient for InMemoryWalletClient {
    async fn adjust(
        &self,
        user_id: UserId,
        action: WalletAction,
        amount: Money,
    ) -> Result<Money, ClientError> {
        let mut state = self.state.write().unwrap();

        if state.transient_failures > 0 {
            state.transient_failures -= 1;
            return Err(ClientError::Service {
                reason: "wallet service unavailable".to_string(),
                transient: true,
            });
        }
        if action == WalletAction::Credit && state.fail_on_credit {
            return Err(ClientError::Service {
                reason: "credit rejected".to_string(),
                transient: false,
            });
        }

        let balance = state.balances.entry(user_id).or_insert(0);
        match action {
            WalletAction::Credit => *balance += amount.minor(),
            WalletAction::Debit => {
                if *balance < amount.minor() {
                    return Err(ClientError::InsufficientBalance {
                        user_id,
                        requested: amount,
                    });
                }
                *balance -= amount.minor();
            }
        }
        Ok(Money::from_minor(*balance))
    }
}
