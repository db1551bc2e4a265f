//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in e-commerce operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Malformed or out-of-range input.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Solution not found.
    #[error("Solution not found: {0}")]
    SolutionNotFound(String),

    /// Testimonial not found.
    #[error("Testimonial not found: {0}")]
    TestimonialNotFound(String),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Illegal order status change.
    #[error("Invalid order transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Checkout attempted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Payment confirmation missing fields or rejected.
    #[error("Payment confirmation invalid: {0}")]
    PaymentValidation(String),

    /// Category still referenced by products.
    #[error("Category {category} is still used by {products} product(s)")]
    CategoryInUse { category: String, products: usize },

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

impl CommerceError {
    /// Build a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CommerceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if a referenced entity was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CommerceError::CategoryNotFound(_)
                | CommerceError::ProductNotFound(_)
                | CommerceError::OrderNotFound(_)
                | CommerceError::SolutionNotFound(_)
                | CommerceError::TestimonialNotFound(_)
                | CommerceError::ClientNotFound(_)
                | CommerceError::ItemNotInCart(_)
        )
    }

    /// Check if the input itself was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CommerceError::Validation { .. } | CommerceError::QuantityExceedsLimit(..)
        )
    }
}
