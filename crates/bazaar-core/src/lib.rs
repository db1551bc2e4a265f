//! Storefront services for Bazaar.
//!
//! Each service wraps the document store and the domain rules from
//! `bazaar-commerce`:
//!
//! - [`CategoryService`]: two-level category hierarchy
//! - [`ProductService`]: product catalog and media uploads
//! - [`CartService`]: one cart per user
//! - [`OrderService`]: checkout and the order status machine
//! - [`ContentService`]: solutions, testimonials, clients
//! - [`AdminService`]: dashboard aggregation over the others
//!
//! Operations that depend on the caller take a [`RequestContext`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bazaar_core::{LocalFileStorage, OfflineGateway, RequestContext, Storefront, StorefrontOptions};
//! use bazaar_store::InMemoryStore;
//!
//! let shop = Storefront::new(
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(LocalFileStorage::new("./public", "/static")),
//!     Arc::new(OfflineGateway::new("rzp_test")),
//!     StorefrontOptions::default(),
//! );
//!
//! let admin = RequestContext::admin("admin-1");
//! let energy = shop.categories.create_category(&admin, "Energy", false, None).await?;
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod content;
mod context;
mod error;
pub mod files;
pub mod orders;
pub mod payment;
pub mod products;

use std::sync::Arc;

use bazaar_commerce::money::Currency;
use bazaar_store::{Collection, DocumentStore};

pub use admin::{AdminOverview, AdminService, CatalogNode, StatusCount};
pub use cart::{CartService, PricedCart, PricedLine};
pub use catalog::CategoryService;
pub use content::ContentService;
pub use context::{RequestContext, RequestId};
pub use error::{ShopError, ShopResult};
pub use files::{FileStorage, LocalFileStorage, Upload, UploadKind};
pub use orders::{OrderQuery, OrderService};
pub use payment::{OfflineGateway, PaymentGateway};
pub use products::{DocumentUpload, ProductQuery, ProductService, ProductUploads};

/// Shop-wide settings the services need.
#[derive(Debug, Clone)]
pub struct StorefrontOptions {
    /// Currency for empty totals and revenue.
    pub currency: Currency,
    /// Prefix for payment receipts.
    pub receipt_prefix: String,
}

impl Default for StorefrontOptions {
    fn default() -> Self {
        Self {
            currency: Currency::INR,
            receipt_prefix: "rcpt_".to_string(),
        }
    }
}

/// All services wired to one store and one set of collaborators.
#[derive(Clone)]
pub struct Storefront {
    pub categories: CategoryService,
    pub products: ProductService,
    pub carts: CartService,
    pub orders: OrderService,
    pub content: ContentService,
    pub admin: AdminService,
}

impl Storefront {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStorage>,
        payments: Arc<dyn PaymentGateway>,
        options: StorefrontOptions,
    ) -> Self {
        let categories = CategoryService::new(store.clone());
        let products = ProductService::new(store.clone(), files.clone(), options.currency);
        let carts = CartService::new(store.clone(), options.currency);
        let orders = OrderService::new(
            store.clone(),
            payments,
            options.currency,
            options.receipt_prefix,
        );
        let content = ContentService::new(store.clone(), files);
        let admin = AdminService::new(
            categories.clone(),
            products.clone(),
            orders.clone(),
            Collection::new(store.clone()),
            Collection::new(store),
            options.currency,
        );

        Self {
            categories,
            products,
            carts,
            orders,
            content,
            admin,
        }
    }
}
