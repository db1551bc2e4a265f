//! Order engine: checkout, status changes and order queries.

use std::sync::Arc;

use bazaar_auth::AuthError;
use bazaar_commerce::cart::Cart;
use bazaar_commerce::catalog::Product;
use bazaar_commerce::checkout::{
    GatewayOrder, Order, OrderLineItem, OrderStatus, PaymentConfirmation, ShippingAddress,
};
use bazaar_commerce::ids::OrderId;
use bazaar_commerce::money::Currency;
use bazaar_commerce::search::{matches_text, Page};
use bazaar_commerce::CommerceError;
use bazaar_store::{Collection, DocumentStore, WriteBatch};
use serde::{Deserialize, Serialize};

use crate::cart::price_cart;
use crate::payment::PaymentGateway;
use crate::{RequestContext, ShopError, ShopResult};

/// Page size of the back-office order table.
pub const ORDERS_PER_PAGE: i64 = 5;

/// Back-office order listing filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    /// Matches the order number or the customer name.
    pub search: Option<String>,
    pub page: i64,
    pub per_page: i64,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            page: 1,
            per_page: ORDERS_PER_PAGE,
        }
    }
}

impl OrderQuery {
    fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |status| order.status == status)
            && self.search.as_deref().map_or(true, |needle| {
                matches_text(&order.order_number, needle)
                    || matches_text(&order.shipping_address.full_name, needle)
            })
    }
}

/// Checkout and order lifecycle.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn DocumentStore>,
    orders: Collection<Order>,
    carts: Collection<Cart>,
    products: Collection<Product>,
    payments: Arc<dyn PaymentGateway>,
    currency: Currency,
    receipt_prefix: String,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        payments: Arc<dyn PaymentGateway>,
        currency: Currency,
        receipt_prefix: impl Into<String>,
    ) -> Self {
        Self {
            orders: Collection::new(store.clone()),
            carts: Collection::new(store.clone()),
            products: Collection::new(store.clone()),
            store,
            payments,
            currency,
            receipt_prefix: receipt_prefix.into(),
        }
    }

    /// Open a gateway order for the caller's current cart total.
    pub async fn initiate_payment(&self, ctx: &RequestContext) -> ShopResult<GatewayOrder> {
        let cart = self.load_cart(ctx).await?;
        let priced = price_cart(&self.products, &cart, self.currency).await?;
        if priced.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }
        if priced.total.amount_minor <= 0 {
            tracing::warn!(
                request_id = %ctx.request_id,
                user_id = %ctx.user_id(),
                "Refused payment for a zero cart total"
            );
            return Err(CommerceError::PaymentValidation(format!(
                "cart total {} is not payable",
                priced.total
            ))
            .into());
        }

        let receipt = format!("{}{}", self.receipt_prefix, ctx.request_id);
        let gateway_order = self.payments.create_order(priced.total, &receipt).await?;
        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %ctx.user_id(),
            gateway_order_id = %gateway_order.id,
            amount = %gateway_order.amount,
            "Initiated payment"
        );
        Ok(gateway_order)
    }

    /// Turn the caller's cart into an order after payment.
    ///
    /// Prices are captured from the products now. The order insert and the
    /// cart clear are committed as one batch.
    pub async fn create_order(
        &self,
        ctx: &RequestContext,
        confirmation: &PaymentConfirmation,
        shipping_address: ShippingAddress,
    ) -> ShopResult<Order> {
        let mut cart = self.load_cart(ctx).await?;
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart.into());
        }
        let payment = confirmation.validate()?;
        shipping_address.validate()?;

        if !self.payments.verify(&payment).await? {
            tracing::warn!(
                request_id = %ctx.request_id,
                user_id = %ctx.user_id(),
                payment_id = %payment.payment_id,
                "Payment confirmation rejected by gateway"
            );
            return Err(CommerceError::PaymentValidation(
                "gateway rejected the confirmation".to_string(),
            )
            .into());
        }

        let mut line_items = Vec::with_capacity(cart.items.len());
        for line in &cart.items {
            let product = self
                .products
                .get(line.product_id.as_str())
                .await?
                .ok_or_else(|| CommerceError::ProductNotFound(line.product_id.to_string()))?;
            line_items.push(OrderLineItem::capture(&product, line.quantity)?);
        }

        let order = Order::place(ctx.user_id().clone(), line_items, shipping_address, payment)?;
        cart.clear();

        let mut batch = WriteBatch::new();
        batch.put(&order)?;
        batch.put(&cart)?;
        if let Err(e) = self.store.commit(batch).await {
            tracing::error!(
                request_id = %ctx.request_id,
                user_id = %ctx.user_id(),
                payment_id = %order.payment.payment_id,
                gateway_order_id = %order.payment.gateway_order_id,
                error = %e,
                "Paid order could not be saved"
            );
            return Err(ShopError::OrderPersistence {
                payment_id: order.payment.payment_id,
                gateway_order_id: order.payment.gateway_order_id,
                reason: e.to_string(),
            });
        }

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %ctx.user_id(),
            order_id = %order.id,
            order_number = %order.order_number,
            total = %order.total,
            "Created order"
        );
        Ok(order)
    }

    /// Move an order along the status machine.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> ShopResult<Order> {
        ctx.require_admin()?;
        let mut order = self.load_order(order_id).await?;
        let previous = order.status;
        if let Err(e) = order.transition(status) {
            tracing::warn!(
                request_id = %ctx.request_id,
                order_id = %order_id,
                from = %previous,
                to = %status,
                "Rejected order status change"
            );
            return Err(e.into());
        }
        self.orders.save(&order).await?;
        tracing::info!(
            request_id = %ctx.request_id,
            order_id = %order_id,
            from = %previous,
            to = %status,
            "Updated order status"
        );
        Ok(order)
    }

    /// Customer cancellation of their own pending order.
    pub async fn cancel_order(&self, ctx: &RequestContext, order_id: &OrderId) -> ShopResult<Order> {
        let mut order = self.load_order(order_id).await?;
        if !order.is_owned_by(ctx.user_id()) {
            tracing::warn!(
                request_id = %ctx.request_id,
                user_id = %ctx.user_id(),
                order_id = %order_id,
                "Cancel attempted on another user's order"
            );
            return Err(AuthError::InsufficientPermissions.into());
        }
        order.cancel()?;
        self.orders.save(&order).await?;
        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %ctx.user_id(),
            order_id = %order_id,
            "Canceled order"
        );
        Ok(order)
    }

    /// The caller's orders, newest first.
    pub async fn list_user_orders(&self, ctx: &RequestContext) -> ShopResult<Vec<Order>> {
        let user_id = ctx.user_id();
        let mut orders = self.orders.filter(|o| o.is_owned_by(user_id)).await?;
        sort_newest_first(&mut orders);
        Ok(orders)
    }

    /// All orders matching `query`, newest first.
    pub async fn list_orders(&self, ctx: &RequestContext, query: &OrderQuery) -> ShopResult<Page<Order>> {
        ctx.require_admin()?;
        let mut orders = self.orders.filter(|o| query.matches(o)).await?;
        sort_newest_first(&mut orders);
        Ok(Page::paginate(orders, query.page, query.per_page))
    }

    /// One order, visible to its owner and to administrators.
    pub async fn get_order(&self, ctx: &RequestContext, order_id: &OrderId) -> ShopResult<Order> {
        let order = self.load_order(order_id).await?;
        if !ctx.identity.can_access(&order.user_id) {
            return Err(AuthError::InsufficientPermissions.into());
        }
        Ok(order)
    }

    async fn load_order(&self, order_id: &OrderId) -> ShopResult<Order> {
        self.orders
            .get(order_id.as_str())
            .await?
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()).into())
    }

    async fn load_cart(&self, ctx: &RequestContext) -> ShopResult<Cart> {
        Ok(self
            .carts
            .get(ctx.user_id().as_str())
            .await?
            .unwrap_or_else(|| Cart::new(ctx.user_id().clone())))
    }
}

fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
}
