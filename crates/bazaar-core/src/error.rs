//! Service layer errors.

use bazaar_auth::AuthError;
use bazaar_commerce::CommerceError;
use bazaar_store::StoreError;
use http::StatusCode;
use thiserror::Error;

/// Result alias for service operations.
pub type ShopResult<T> = Result<T, ShopError>;

/// Errors returned by storefront services.
#[derive(Error, Debug)]
pub enum ShopError {
    /// A domain rule rejected the operation.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// The caller is unauthenticated or not allowed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The document store failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// File storage or the payment gateway failed.
    #[error("Upstream service failed: {0}")]
    Upstream(String),

    /// Payment went through but the order could not be written.
    #[error(
        "Order not saved after payment {payment_id} (gateway order {gateway_order_id}): {reason}"
    )]
    OrderPersistence {
        payment_id: String,
        gateway_order_id: String,
        reason: String,
    },
}

impl ShopError {
    /// Shorthand for a field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ShopError::Commerce(CommerceError::validation(field, message))
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::Commerce(e) => match e {
                CommerceError::Validation { .. }
                | CommerceError::QuantityExceedsLimit(..)
                | CommerceError::Overflow => StatusCode::BAD_REQUEST,
                CommerceError::InvalidTransition { .. } | CommerceError::CategoryInUse { .. } => {
                    StatusCode::CONFLICT
                }
                CommerceError::EmptyCart
                | CommerceError::PaymentValidation(_)
                | CommerceError::CurrencyMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                e if e.is_not_found() => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            ShopError::Auth(e) if e.is_permission_error() => StatusCode::FORBIDDEN,
            ShopError::Auth(_) => StatusCode::UNAUTHORIZED,
            ShopError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ShopError::OrderPersistence { .. } | ShopError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Check if the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        match self {
            ShopError::Upstream(_) => true,
            ShopError::Store(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Check if a referenced entity was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ShopError::Commerce(e) if e.is_not_found())
    }

    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ShopError::Commerce(e) if e.is_validation() => "validation",
            ShopError::Commerce(e) if e.is_not_found() => "not_found",
            ShopError::Commerce(CommerceError::InvalidTransition { .. }) => "invalid_transition",
            ShopError::Commerce(CommerceError::CategoryInUse { .. }) => "category_in_use",
            ShopError::Commerce(CommerceError::EmptyCart) => "empty_cart",
            ShopError::Commerce(CommerceError::PaymentValidation(_)) => "payment_validation",
            ShopError::Commerce(_) => "invalid_request",
            ShopError::Auth(e) if e.is_permission_error() => "forbidden",
            ShopError::Auth(_) => "unauthenticated",
            ShopError::Store(_) => "store",
            ShopError::Upstream(_) => "upstream",
            ShopError::OrderPersistence { .. } => "order_persistence",
        }
    }
}
