//! Saga error taxonomy.

use common::{ProductId, UserId};
use domain::{DomainError, Money};
use store::StoreError;
use thiserror::Error;

/// Broad error classification used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad payload, rejected before any side effect.
    Validation,
    /// Unknown user, order, or product.
    NotFound,
    /// Lock not acquired in time, or wrong order status for the transition.
    Conflict,
    /// Insufficient wallet balance or insufficient stock.
    ResourceExhausted,
    /// A remote service failed after retries were exhausted.
    Dependency,
    /// Local persistence failure.
    Internal,
}

/// Errors produced by saga execution.
///
/// Validation, not-found, and resource-exhausted errors are terminal and
/// reported directly; dependency and internal errors occurring after a
/// mutating step trigger compensation before being reported.
#[derive(Debug, Error)]
pub enum SagaError {
    /// Bad request payload.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Unknown user, order, or product.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The order is not in the required status for the requested transition.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A lock could not be acquired within the bounded wait.
    #[error("Lock acquisition timed out for {entity}")]
    LockTimeout { entity: String },

    /// Requested quantity exceeds the available stock.
    #[error("Out of stock: product {product_id} has {available}, requested {requested}")]
    OutOfStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// The wallet rejected a debit.
    #[error("Insufficient balance for user {user_id}: debit of {requested} rejected")]
    InsufficientBalance { user_id: UserId, requested: Money },

    /// A remote service failed after the retry budget was exhausted.
    #[error("{service} service failed after {attempts} attempt(s): {reason}")]
    Dependency {
        service: &'static str,
        attempts: u32,
        reason: String,
    },

    /// Local persistence failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SagaError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SagaError::Validation(_) => ErrorKind::Validation,
            SagaError::NotFound(_) => ErrorKind::NotFound,
            SagaError::Conflict(_) | SagaError::LockTimeout { .. } => ErrorKind::Conflict,
            SagaError::OutOfStock { .. } | SagaError::InsufficientBalance { .. } => {
                ErrorKind::ResourceExhausted
            }
            SagaError::Dependency { .. } => ErrorKind::Dependency,
            SagaError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<DomainError> for SagaError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NoItems | DomainError::InvalidQuantity { .. } => {
                SagaError::Validation(err.to_string())
            }
            DomainError::InvalidStatusTransition { .. } => SagaError::Conflict(err.to_string()),
        }
    }
}

impl From<StoreError> for SagaError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ProductNotFound(id) => SagaError::NotFound(format!("Product {id}")),
            StoreError::OrderNotFound(id) => SagaError::NotFound(format!("Order {id}")),
            StoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => SagaError::OutOfStock {
                product_id,
                available,
                requested,
            },
            StoreError::Storage(reason) => SagaError::Internal(reason),
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use common::OrderId;
    use domain::OrderStatus;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            SagaError::Validation("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(SagaError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            SagaError::LockTimeout {
                entity: "product 1".into()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            SagaError::OutOfStock {
                product_id: ProductId::new(1),
                available: 2,
                requested: 3,
            }
            .kind(),
            ErrorKind::ResourceExhausted
        );
        assert_eq!(
            SagaError::Dependency {
                service: "wallet",
                attempts: 3,
                reason: "x".into()
            }
            .kind(),
            ErrorKind::Dependency
        );
        assert_eq!(SagaError::Internal("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_store_error_mapping() {
        let err: SagaError = StoreError::OrderNotFound(OrderId::new(7)).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: SagaError = StoreError::InsufficientStock {
            product_id: ProductId::new(1),
            available: 0,
            requested: 1,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
    }

    #[test]
    fn test_domain_error_mapping() {
        let err: SagaError = DomainError::NoItems.into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: SagaError = DomainError::InvalidStatusTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelling,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
