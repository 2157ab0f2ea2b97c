//! Order and line-item records.

use common::{OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::money::Money;
use crate::status::OrderStatus;

/// A line item in an order.
///
/// Items belong to exactly one order and have no independent lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product being ordered.
    pub product_id: ProductId,
    /// Quantity ordered; always positive in a persisted order.
    pub quantity: u32,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A persisted marketplace order.
///
/// The total is set once at creation from `Σ(quantity × unit price)` with
/// the discount rule applied, and is immutable afterwards. Status is only
/// mutated by the saga coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier assigned by the order store at creation.
    pub id: OrderId,
    /// The user who placed the order.
    pub user_id: UserId,
    /// Total price in minor units, discount already applied.
    pub total_price: Money,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Ordered line items.
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Validates a creation payload: non-empty items, all quantities positive.
    ///
    /// Runs before any lock is taken or remote call is made.
    pub fn validate_items(items: &[OrderItem]) -> Result<(), DomainError> {
        if items.is_empty() {
            return Err(DomainError::NoItems);
        }
        for item in items {
            if item.quantity == 0 {
                return Err(DomainError::InvalidQuantity {
                    product_id: item.product_id,
                    quantity: item.quantity,
                });
            }
        }
        Ok(())
    }

    /// Checks that a transition to `next` is legal from the current status.
    pub fn check_transition(&self, next: OrderStatus) -> Result<(), DomainError> {
        let allowed = match next {
            OrderStatus::Cancelling => self.status.can_cancel(),
            OrderStatus::Delivering => self.status.can_deliver(),
            OrderStatus::Cancelled => self.status == OrderStatus::Cancelling,
            OrderStatus::Delivered => self.status == OrderStatus::Delivering,
            // Restoring Placed is the rollback of a transient marker.
            OrderStatus::Placed => self.status.is_transient(),
        };
        if allowed {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: next,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_status(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            total_price: Money::from_minor(270),
            status,
            items: vec![OrderItem::new(ProductId::new(1), 3)],
        }
    }

    #[test]
    fn test_validate_rejects_empty_items() {
        assert_eq!(Order::validate_items(&[]), Err(DomainError::NoItems));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let items = vec![
            OrderItem::new(ProductId::new(1), 2),
            OrderItem::new(ProductId::new(2), 0),
        ];
        assert_eq!(
            Order::validate_items(&items),
            Err(DomainError::InvalidQuantity {
                product_id: ProductId::new(2),
                quantity: 0
            })
        );
    }

    #[test]
    fn test_validate_accepts_positive_quantities() {
        let items = vec![OrderItem::new(ProductId::new(1), 1)];
        assert!(Order::validate_items(&items).is_ok());
    }

    #[test]
    fn test_placed_order_can_enter_cancelling() {
        let order = order_with_status(OrderStatus::Placed);
        assert!(order.check_transition(OrderStatus::Cancelling).is_ok());
        assert!(order.check_transition(OrderStatus::Delivering).is_ok());
    }

    #[test]
    fn test_delivered_order_rejects_cancel() {
        let order = order_with_status(OrderStatus::Delivered);
        assert_eq!(
            order.check_transition(OrderStatus::Cancelling),
            Err(DomainError::InvalidStatusTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Cancelling,
            })
        );
    }

    #[test]
    fn test_transient_marker_can_revert_to_placed() {
        let order = order_with_status(OrderStatus::Cancelling);
        assert!(order.check_transition(OrderStatus::Placed).is_ok());
        assert!(order.check_transition(OrderStatus::Cancelled).is_ok());

        let placed = order_with_status(OrderStatus::Placed);
        assert!(placed.check_transition(OrderStatus::Placed).is_err());
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let order = order_with_status(OrderStatus::Placed);
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
