//! E-commerce domain types and rules for the Bazaar storefront.
//!
//! This crate holds the plain data model and the rules that do not need
//! storage:
//!
//! - **Catalog**: Two-level categories, products, product media
//! - **Cart**: Per-user cart with merged lines and a quantity cap
//! - **Checkout**: Shipping address, payment data, orders and their status machine
//! - **Content**: Solutions, testimonials, clients
//! - **Search**: Text matching and pagination
//!
//! With the `storage` feature every stored type implements
//! `bazaar_store::Document`.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_commerce::prelude::*;
//!
//! let energy = Category::new_root("Energy")?;
//! let solar = Category::new_child(&energy, "Solar")?;
//!
//! let product = Product::new(ProductDraft {
//!     name: "Solar Panel".to_string(),
//!     price: Money::parse("15000", Currency::INR).unwrap(),
//!     category_id: energy.id.clone(),
//!     subcategory_id: Some(solar.id.clone()),
//!     // ...
//! })?;
//!
//! let mut cart = Cart::new(UserId::new("user-1"));
//! cart.add_item(product.id.clone(), 2)?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod content;
pub mod search;

#[cfg(feature = "storage")]
mod storage;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Category, Product, ProductDocument, ProductDraft, ProductPatch, VideoMedia,
    };

    // Cart
    pub use crate::cart::{Cart, CartLine};

    // Checkout
    pub use crate::checkout::{
        GatewayOrder, Order, OrderLineItem, OrderStatus, PaymentConfirmation, PaymentDetails,
        ShippingAddress,
    };

    // Content
    pub use crate::content::{Client, Solution, Testimonial};

    // Search
    pub use crate::search::{Page, Pagination};
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
