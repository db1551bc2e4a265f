//! Cart and cart line types.

use crate::current_timestamp;
use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A user's shopping cart.
///
/// Lines keep insertion order and a product appears on at most one line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Owning user; also the storage key.
    pub user_id: UserId,
    /// Items in the cart.
    pub items: Vec<CartLine>,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            updated_at: current_timestamp(),
        }
    }

    /// Add a product to the cart, merging with an existing line.
    ///
    /// Returns the resulting line quantity.
    pub fn add_item(&mut self, product_id: ProductId, quantity: i64) -> Result<i64, CommerceError> {
        validate_quantity(quantity)?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            existing.quantity = new_quantity;
            self.updated_at = current_timestamp();
            return Ok(new_quantity);
        }

        self.items.push(CartLine {
            product_id,
            quantity,
        });
        self.updated_at = current_timestamp();
        Ok(quantity)
    }

    /// Set the quantity of an existing line.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        validate_quantity(quantity)?;
        let line = self
            .items
            .iter_mut()
            .find(|i| &i.product_id == product_id)
            .ok_or_else(|| CommerceError::ItemNotInCart(product_id.to_string()))?;
        line.quantity = quantity;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = current_timestamp();
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of a product in the cart, zero if absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.items
            .iter()
            .find(|i| &i.product_id == product_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|i| &i.product_id == product_id)
    }
}

/// A (product, quantity) pairing in a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// Product reference.
    pub product_id: ProductId,
    /// Quantity, at least 1.
    pub quantity: i64,
}

fn validate_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity < 1 {
        return Err(CommerceError::validation(
            "quantity",
            format!("must be at least 1, got {}", quantity),
        ));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        Cart::new(UserId::new("user-1"))
    }

    #[test]
    fn test_cart_creation() {
        let cart = cart();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_item_merges_lines() {
        let mut cart = cart();
        cart.add_item(ProductId::new("prod-1"), 2).unwrap();
        let qty = cart.add_item(ProductId::new("prod-1"), 3).unwrap();

        assert_eq!(qty, 5);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(&ProductId::new("prod-1")), 5);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = cart();
        cart.add_item(ProductId::new("b"), 1).unwrap();
        cart.add_item(ProductId::new("a"), 1).unwrap();
        cart.add_item(ProductId::new("b"), 1).unwrap();

        let ids: Vec<&str> = cart.items.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_add_invalid_quantity() {
        let mut cart = cart();
        assert!(cart.add_item(ProductId::new("prod-1"), 0).unwrap_err().is_validation());
        assert!(cart.add_item(ProductId::new("prod-1"), -4).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = cart();
        cart.add_item(ProductId::new("prod-1"), MAX_QUANTITY_PER_ITEM).unwrap();
        let err = cart.add_item(ProductId::new("prod-1"), 1).unwrap_err();
        assert!(matches!(err, CommerceError::QuantityExceedsLimit(10000, 9999)));
        assert_eq!(cart.quantity_of(&ProductId::new("prod-1")), MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_update_quantity_zero_leaves_cart_unchanged() {
        let mut cart = cart();
        cart.add_item(ProductId::new("prod-1"), 2).unwrap();
        let before = cart.clone();

        let err = cart.update_quantity(&ProductId::new("prod-1"), 0).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_quantity_missing_line() {
        let mut cart = cart();
        let err = cart.update_quantity(&ProductId::new("nope"), 2).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_item() {
        let mut cart = cart();
        cart.add_item(ProductId::new("prod-1"), 7).unwrap();
        assert!(cart.remove_item(&ProductId::new("prod-1")));
        assert!(!cart.remove_item(&ProductId::new("prod-1")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = cart();
        cart.add_item(ProductId::new("a"), 1).unwrap();
        cart.add_item(ProductId::new("b"), 2).unwrap();
        assert_eq!(cart.item_count(), 3);
        cart.clear();
        assert!(cart.is_empty());
    }
}
