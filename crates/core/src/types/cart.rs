//! The cart value.
//!
//! A `Cart` is an ordered list of [`CartItem`]s, unique by product id, with
//! every amount at least 1. Both rules are checked when a cart is built from
//! a list (including on deserialization), so a persisted blob that breaks
//! them is rejected as a whole.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CartItem, Price, ProductId};

/// A list of cart items violates the cart's shape rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartShapeError {
    /// The same product appears on two lines.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),

    /// A line has a zero amount.
    #[error("product {0} has a zero amount")]
    ZeroAmount(ProductId),
}

/// Ordered, unique-by-id collection of cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

/// Aggregate figures shown next to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    /// Number of distinct products (the header badge count).
    pub distinct_products: usize,
    /// Sum of all line amounts.
    pub total_items: u64,
    /// Sum of all line subtotals.
    pub total: Price,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over the cart lines.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the product has a line in the cart.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Append a new line.
    ///
    /// # Errors
    ///
    /// Returns `CartShapeError` if the product is already in the cart or the
    /// item's amount is zero. The cart is not modified in that case.
    pub fn push(&mut self, item: CartItem) -> Result<(), CartShapeError> {
        if item.amount == 0 {
            return Err(CartShapeError::ZeroAmount(item.id));
        }
        if self.contains(item.id) {
            return Err(CartShapeError::DuplicateProduct(item.id));
        }
        self.items.push(item);
        Ok(())
    }

    /// Set the amount of an existing line.
    ///
    /// Returns the updated line, or `None` if the product is not in the cart
    /// or `amount` is zero.
    pub fn set_amount(&mut self, id: ProductId, amount: u32) -> Option<&CartItem> {
        if amount == 0 {
            return None;
        }
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.amount = amount;
        Some(&*item)
    }

    /// Remove a product's line, returning it.
    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Compute the cart totals.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            distinct_products: self.items.len(),
            total_items: self.items.iter().map(|item| u64::from(item.amount)).sum(),
            total: self.items.iter().map(CartItem::subtotal).sum(),
        }
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartShapeError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        let mut cart = Self::new();
        for item in items {
            cart.push(item)?;
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: u32, amount: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Shoe {id}"),
            price: Price::from_cents(10000),
            image_url: "x".to_string(),
            amount,
        }
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut cart = Cart::new();
        cart.push(item(1, 1)).unwrap();

        let err = cart.push(item(1, 3)).unwrap_err();
        assert_eq!(err, CartShapeError::DuplicateProduct(ProductId::new(1)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 1);
    }

    #[test]
    fn test_push_rejects_zero_amount() {
        let mut cart = Cart::new();
        let err = cart.push(item(1, 0)).unwrap_err();
        assert_eq!(err, CartShapeError::ZeroAmount(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_amount_is_absolute() {
        let mut cart = Cart::try_from(vec![item(1, 2), item(2, 1)]).unwrap();

        let updated = cart.set_amount(ProductId::new(1), 5).unwrap();
        assert_eq!(updated.amount, 5);
        assert!(cart.set_amount(ProductId::new(9), 5).is_none());
        assert!(cart.set_amount(ProductId::new(2), 0).is_none());
        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 1);
    }

    #[test]
    fn test_remove_keeps_order_of_remaining_lines() {
        let mut cart = Cart::try_from(vec![item(1, 1), item(2, 1), item(3, 1)]).unwrap();

        let removed = cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(removed.id, ProductId::new(2));
        let ids: Vec<u32> = cart.iter().map(|i| i.id.as_u32()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(cart.remove(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        let json = r#"[
            {"id":1,"name":"A","price":10,"imageUrl":"a","amount":1},
            {"id":1,"name":"A","price":10,"imageUrl":"a","amount":2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let cart = Cart::try_from(vec![item(1, 2)]).unwrap();
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["amount"], 2);
        assert_eq!(json[0]["imageUrl"], "x");

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_summary() {
        let mut cart = Cart::try_from(vec![item(1, 2), item(2, 1)]).unwrap();
        cart.set_amount(ProductId::new(2), 3);

        let summary = cart.summary();
        assert_eq!(summary.distinct_products, 2);
        assert_eq!(summary.total_items, 5);
        assert_eq!(summary.total, Price::from_cents(50000));
        assert_eq!(Cart::new().summary().total, Price::ZERO);
    }
}
