//! Ordered log of committed compensations.
//!
//! Each forward step that mutates a resource records its inverse here as it
//! succeeds. On abort the coordinator replays the log most-recent-first,
//! collecting compensation-level failures instead of raising them, so the
//! original cause is what the caller sees.

use common::{ProductId, UserId};
use domain::Money;

/// The inverse of a completed forward step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Credit back an order-creation debit.
    CreditWallet { user_id: UserId, amount: Money },
    /// Debit back a cancellation credit.
    DebitWallet { user_id: UserId, amount: Money },
    /// Give the one-time discount back (flag → false).
    ResetDiscount { user_id: UserId },
    /// Put reserved stock back (creation rollback).
    RestoreStock { product_id: ProductId, quantity: u32 },
    /// Take back stock restored during cancellation.
    ReclaimStock { product_id: ProductId, quantity: u32 },
}

/// Compensations recorded by a saga, in forward-step order.
#[derive(Debug, Default)]
pub struct CompensationLog {
    entries: Vec<Compensation>,
}

impl CompensationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the inverse of a forward step that just succeeded.
    pub fn record(&mut self, compensation: Compensation) {
        self.entries.push(compensation);
    }

    /// True when no mutating step has completed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded compensations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Consumes the log, yielding compensations most-recent-first.
    pub fn into_reverse_iter(self) -> impl Iterator<Item = Compensation> {
        self.entries.into_iter().rev()
    }
}
