//! Account service client: discount flag reads and toggles.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;

use super::ClientError;

/// The slice of a user record the saga consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserProfile {
    /// The user's identifier.
    pub id: UserId,
    /// True once the user's one-time discount has been consumed.
    pub discount_used: bool,
}

/// Remote call surface of the account service.
///
/// Both toggle operations are idempotent on the remote side: setting an
/// already-set flag (or resetting an already-clear one) succeeds.
#[async_trait]
pub trait AccountClient: Send + Sync {
    /// Fetches a user's discount flag.
    async fn fetch_user(&self, user_id: UserId) -> Result<UserProfile, ClientError>;

    /// Marks the user's one-time discount as consumed (flag → true).
    async fn set_discount_used(&self, user_id: UserId) -> Result<(), ClientError>;

    /// Restores the user's discount (flag → false). Compensation only.
    async fn reset_discount(&self, user_id: UserId) -> Result<(), ClientError>;
}

#[derive(Debug, Default)]
struct InMemoryAccountState {
    // user id -> discount_used
    users: HashMap<UserId, bool>,
    fail_on_set_discount: bool,
    transient_fetch_failures: u32,
}

/// In-memory account client for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountClient {
    state: Arc<RwLock<InMemoryAccountState>>,
}

impl InMemoryAccountClient {
    /// Creates a new in-memory account client with no users.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user with the given discount flag.
    pub fn register_user(&self, user_id: UserId, discount_used: bool) {
        self.state
            .write()
            .unwrap()
            .users
            .insert(user_id, discount_used);
    }

    /// Returns the user's discount flag, if the user exists.
    pub fn discount_used(&self, user_id: UserId) -> Option<bool> {
        self.state.read().unwrap().users.get(&user_id).copied()
    }

    /// Configures the client to fail hard on set-discount calls.
    pub fn set_fail_on_set_discount(&self, fail: bool) {
        self.state.write().unwrap().fail_on_set_discount = fail;
    }

    /// Makes the next `n` fetch calls fail with a transient error.
    pub fn inject_transient_fetch_failures(&self, n: u32) {
        self.state.write().unwrap().transient_fetch_failures = n;
    }
}

#[async_trait]
impl AccountClient for InMemoryAccountClient {
    async fn fetch_user(&self, user_id: UserId) -> Result<UserProfile, ClientError> {
        let mut state = self.state.write().unwrap();

        if state.transient_fetch_failures > 0 {
            state.transient_fetch_failures -= 1;
            return Err(ClientError::Service {
                reason: "account service unavailable".to_string(),
                transient: true,
            });
        }

        state
            .users
            .get(&user_id)
            .map(|&discount_used| UserProfile {
                id: user_id,
                discount_used,
            })
            .ok_or_else(|| ClientError::NotFound(format!("User {user_id}")))
    }

    async fn set_discount_used(&self, user_id: UserId) -> Result<(), ClientError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_set_discount {
            return Err(ClientError::Service {
                reason: "discount update rejected".to_string(),
                transient: false,
            });
        }

        match state.users.get_mut(&user_id) {
            Some(flag) => {
                *flag = true;
                Ok(())
            }
            None => Err(ClientError::NotFound(format!("User {user_id}"))),
        }
    }

    async fn reset_discount(&self, user_id: UserId) -> Result<(), ClientError> {
        let mut state = self.state.write().unwrap();
        match state.users.get_mut(&user_id) {
            Some(flag) => {
                *flag = false;
                Ok(())
            }
            None => Err(ClientError::NotFound(format!("User {user_id}"))),
        }
    }
}
