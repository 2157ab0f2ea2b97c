//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Placed ──┬──► Delivering ──► Delivered
///          │
///          └──► Cancelling ──► Cancelled
/// ```
///
/// `Cancelling` and `Delivering` are transient markers persisted while the
/// owning saga is in flight; they fence off a concurrent cancel or deliver
/// racing on the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order has been placed and paid for.
    #[default]
    Placed,

    /// A cancellation saga is restoring stock and crediting the wallet.
    Cancelling,

    /// Order was cancelled, stock and wallet restored (terminal).
    Cancelled,

    /// A delivery transition is in flight.
    Delivering,

    /// Order has been delivered (terminal).
    Delivered,
}

impl OrderStatus {
    /// Returns true if a cancellation saga may start from this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Placed)
    }

    /// Returns true if a delivery transition may start from this status.
    pub fn can_deliver(&self) -> bool {
        matches!(self, OrderStatus::Placed)
    }

    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Delivered)
    }

    /// Returns true if this is a transient in-flight marker.
    pub fn is_transient(&self) -> bool {
        matches!(self, OrderStatus::Cancelling | OrderStatus::Delivering)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Cancelling => "CANCELLING",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Delivering => "DELIVERING",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
