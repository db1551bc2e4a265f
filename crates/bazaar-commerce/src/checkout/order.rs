//! Order types and the order status machine.

use crate::catalog::Product;
use crate::checkout::{PaymentDetails, ShippingAddress};
use crate::current_timestamp;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status.
///
/// `Pending -> Processing -> Shipped -> Delivered` is the fulfilment path;
/// `Canceled` is reachable from `Pending` and `Processing` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order canceled.
    Canceled,
}

impl OrderStatus {
    /// All statuses, in fulfilment order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Canceled => "Canceled",
        }
    }

    /// Position along the fulfilment path.
    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Canceled => 4,
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Canceled)
    }

    /// Check if the order can still be canceled by staff.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Check whether moving to `next` is legal.
    ///
    /// Forward jumps along the fulfilment path are allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() || *self == next {
            return false;
        }
        match next {
            OrderStatus::Canceled => self.can_cancel(),
            _ => next.rank() > self.rank(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = if wanted == "cancelled" { "canceled".to_string() } else { wanted };
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CommerceError::validation("status", format!("unknown status '{}'", s)))
    }
}

/// A completed purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    /// Customer user ID.
    pub user_id: UserId,
    /// Items in the order, priced at purchase time.
    pub line_items: Vec<OrderLineItem>,
    /// Grand total charged.
    pub total: Money,
    /// Shipping address.
    pub shipping_address: ShippingAddress,
    /// Gateway payment identifiers.
    pub payment: PaymentDetails,
    /// Order status.
    pub status: OrderStatus,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
    /// Unix timestamp when canceled (if applicable).
    pub canceled_at: Option<i64>,
}

impl Order {
    /// Place a new pending order.
    ///
    /// The total is computed once from the line snapshot.
    pub fn place(
        user_id: UserId,
        line_items: Vec<OrderLineItem>,
        shipping_address: ShippingAddress,
        payment: PaymentDetails,
    ) -> Result<Self, CommerceError> {
        let first = line_items.first().ok_or(CommerceError::EmptyCart)?;
        let currency = first.unit_price.currency;
        if let Some(other) = line_items.iter().find(|l| l.unit_price.currency != currency) {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: other.unit_price.currency.code().to_string(),
            });
        }
        let total = Money::try_sum(line_items.iter().map(|l| &l.line_total), currency)
            .ok_or(CommerceError::Overflow)?;

        let now = current_timestamp();
        Ok(Self {
            id: OrderId::generate(),
            order_number: Self::generate_order_number(),
            user_id,
            line_items,
            total,
            shipping_address,
            payment,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
            canceled_at: None,
        })
    }

    /// Generate a new order number.
    pub fn generate_order_number() -> String {
        let suffix: u16 = rand::random();
        format!("ORD-{}-{:04X}", current_timestamp(), suffix)
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }

    /// Check if `user_id` placed this order.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Move to a new status, enforcing the status machine.
    pub fn transition(&mut self, next: OrderStatus) -> Result<(), CommerceError> {
        if !self.status.can_transition_to(next) {
            return Err(CommerceError::InvalidTransition {
                from: self.status.display_name().to_string(),
                to: next.display_name().to_string(),
            });
        }
        let now = current_timestamp();
        if next == OrderStatus::Canceled {
            self.canceled_at = Some(now);
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Customer cancellation; only a pending order can be canceled this way.
    pub fn cancel(&mut self) -> Result<(), CommerceError> {
        if self.status != OrderStatus::Pending {
            return Err(CommerceError::InvalidTransition {
                from: self.status.display_name().to_string(),
                to: OrderStatus::Canceled.display_name().to_string(),
            });
        }
        self.transition(OrderStatus::Canceled)
    }

    /// Check if the order counts toward revenue.
    pub fn is_billable(&self) -> bool {
        self.status != OrderStatus::Canceled
    }
}

/// A line item in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name at time of order.
    pub name: String,
    /// Unit price at time of order.
    pub unit_price: Money,
    /// Quantity ordered.
    pub quantity: i64,
    /// Total price for this line.
    pub line_total: Money,
}

impl OrderLineItem {
    /// Snapshot a product at its current price.
    pub fn capture(product: &Product, quantity: i64) -> Result<Self, CommerceError> {
        let line_total = product
            .price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            line_total,
        })
    }
}
