//! Cart store.

use std::sync::Arc;

use bazaar_commerce::cart::Cart;
use bazaar_commerce::catalog::Product;
use bazaar_commerce::ids::ProductId;
use bazaar_commerce::money::{Currency, Money};
use bazaar_commerce::CommerceError;
use bazaar_store::{Collection, DocumentStore};
use serde::Serialize;

use crate::{RequestContext, ShopResult};

/// A cart line joined with the current product data.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricedLine {
    pub product: Product,
    pub quantity: i64,
    pub line_total: Money,
}

/// The cart as the storefront renders it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    /// Sum of line totals at current prices.
    pub total: Money,
}

impl PricedCart {
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One cart per user.
#[derive(Clone)]
pub struct CartService {
    carts: Collection<Cart>,
    products: Collection<Product>,
    currency: Currency,
}

impl CartService {
    /// `currency` is used for the total of an empty cart.
    pub fn new(store: Arc<dyn DocumentStore>, currency: Currency) -> Self {
        Self {
            carts: Collection::new(store.clone()),
            products: Collection::new(store),
            currency,
        }
    }

    /// Add a product, merging with an existing line.
    pub async fn add_item(
        &self,
        ctx: &RequestContext,
        product_id: &ProductId,
        quantity: i64,
    ) -> ShopResult<Cart> {
        if !self.products.exists(product_id.as_str()).await? {
            return Err(CommerceError::ProductNotFound(product_id.to_string()).into());
        }
        let mut cart = self.get_cart(ctx).await?;
        let line_quantity = cart.add_item(product_id.clone(), quantity)?;
        self.carts.save(&cart).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %ctx.user_id(),
            product_id = %product_id,
            quantity = line_quantity,
            "Added to cart"
        );
        Ok(cart)
    }

    /// Remove a product's line whatever its quantity.
    pub async fn remove_item(&self, ctx: &RequestContext, product_id: &ProductId) -> ShopResult<Cart> {
        let mut cart = self.get_cart(ctx).await?;
        if cart.remove_item(product_id) {
            self.carts.save(&cart).await?;
            tracing::info!(
                request_id = %ctx.request_id,
                user_id = %ctx.user_id(),
                product_id = %product_id,
                "Removed from cart"
            );
        }
        Ok(cart)
    }

    /// Set a line's quantity. Quantities below 1 are rejected.
    pub async fn update_quantity(
        &self,
        ctx: &RequestContext,
        product_id: &ProductId,
        quantity: i64,
    ) -> ShopResult<Cart> {
        let mut cart = self.get_cart(ctx).await?;
        cart.update_quantity(product_id, quantity)?;
        self.carts.save(&cart).await?;
        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %ctx.user_id(),
            product_id = %product_id,
            quantity,
            "Updated cart quantity"
        );
        Ok(cart)
    }

    /// The caller's cart; empty if they never added anything.
    pub async fn get_cart(&self, ctx: &RequestContext) -> ShopResult<Cart> {
        Ok(self
            .carts
            .get(ctx.user_id().as_str())
            .await?
            .unwrap_or_else(|| Cart::new(ctx.user_id().clone())))
    }

    /// The caller's cart with current product data and total.
    ///
    /// Lines whose product no longer exists are skipped.
    pub async fn priced_cart(&self, ctx: &RequestContext) -> ShopResult<PricedCart> {
        let cart = self.get_cart(ctx).await?;
        price_cart(&self.products, &cart, self.currency).await
    }
}

pub(crate) async fn price_cart(
    products: &Collection<Product>,
    cart: &Cart,
    currency: Currency,
) -> ShopResult<PricedCart> {
    let mut lines = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        let Some(product) = products.get(item.product_id.as_str()).await? else {
            continue;
        };
        let line_total = product
            .price
            .try_multiply(item.quantity)
            .ok_or(CommerceError::Overflow)?;
        lines.push(PricedLine {
            product,
            quantity: item.quantity,
            line_total,
        });
    }

    let currency = lines.first().map_or(currency, |l| l.line_total.currency);
    let mut total = Money::zero(currency);
    for line in &lines {
        if line.line_total.currency != currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: line.line_total.currency.code().to_string(),
            }
            .into());
        }
        total = total
            .try_add(&line.line_total)
            .ok_or(CommerceError::Overflow)?;
    }
    Ok(PricedCart { lines, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_commerce::catalog::ProductDraft;
    use bazaar_commerce::ids::CategoryId;
    use bazaar_store::InMemoryStore;

    async fn fixture() -> (CartService, Collection<Product>) {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        (
            CartService::new(store.clone(), Currency::INR),
            Collection::new(store),
        )
    }

    async fn product(products: &Collection<Product>, name: &str, price: i64) -> Product {
        let product = Product::new(ProductDraft {
            name: name.to_string(),
            price: Money::new(price, Currency::INR),
            description: String::new(),
            category_id: CategoryId::new("cat"),
            subcategory_id: None,
            featured: false,
            rating: 0.0,
            reviews: 0,
            features: Vec::new(),
            video_url: None,
        })
        .unwrap();
        products.save(&product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_empty_cart_is_not_an_error() {
        let (svc, _) = fixture().await;
        let ctx = RequestContext::customer("u1");
        let cart = svc.get_cart(&ctx).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.user_id.as_str(), "u1");

        let priced = svc.priced_cart(&ctx).await.unwrap();
        assert!(priced.is_empty());
        assert_eq!(priced.total, Money::zero(Currency::INR));
    }

    #[tokio::test]
    async fn test_repeated_add_sums_quantity() {
        let (svc, products) = fixture().await;
        let ctx = RequestContext::customer("u1");
        let p = product(&products, "A", 100).await;

        svc.add_item(&ctx, &p.id, 1).await.unwrap();
        svc.add_item(&ctx, &p.id, 2).await.unwrap();
        let cart = svc.add_item(&ctx, &p.id, 4).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(&p.id), 7);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let (svc, _) = fixture().await;
        let err = svc
            .add_item(&RequestContext::customer("u1"), &ProductId::new("ghost"), 1)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_quantity_zero_keeps_cart() {
        let (svc, products) = fixture().await;
        let ctx = RequestContext::customer("u1");
        let p = product(&products, "A", 100).await;
        svc.add_item(&ctx, &p.id, 3).await.unwrap();

        let err = svc.update_quantity(&ctx, &p.id, 0).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(svc.get_cart(&ctx).await.unwrap().quantity_of(&p.id), 3);

        let cart = svc.update_quantity(&ctx, &p.id, 5).await.unwrap();
        assert_eq!(cart.quantity_of(&p.id), 5);
    }

    #[tokio::test]
    async fn test_carts_are_per_user() {
        let (svc, products) = fixture().await;
        let p = product(&products, "A", 100).await;
        svc.add_item(&RequestContext::customer("u1"), &p.id, 1).await.unwrap();

        let other = svc.get_cart(&RequestContext::customer("u2")).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_remove_item() {
        let (svc, products) = fixture().await;
        let ctx = RequestContext::customer("u1");
        let p = product(&products, "A", 100).await;
        svc.add_item(&ctx, &p.id, 9).await.unwrap();

        let cart = svc.remove_item(&ctx, &p.id).await.unwrap();
        assert!(cart.is_empty());
        assert!(svc.get_cart(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_priced_cart_skips_vanished_products() {
        let (svc, products) = fixture().await;
        let ctx = RequestContext::customer("u1");
        let a = product(&products, "A", 100).await;
        let b = product(&products, "B", 50).await;
        svc.add_item(&ctx, &a.id, 2).await.unwrap();
        svc.add_item(&ctx, &b.id, 1).await.unwrap();

        let priced = svc.priced_cart(&ctx).await.unwrap();
        assert_eq!(priced.total, Money::new(250, Currency::INR));
        assert_eq!(priced.item_count(), 3);

        products.remove(b.id.as_str()).await.unwrap();
        let priced = svc.priced_cart(&ctx).await.unwrap();
        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.total, Money::new(200, Currency::INR));
    }
}
