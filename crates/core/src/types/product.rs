//! Catalog, stock and cart line records.
//!
//! Field names follow the storefront API's JSON (`imageUrl` is camelCase on
//! the wire), which is also the shape persisted for the cart.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A catalog record as returned by `GET products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
}

/// Stock record as returned by `GET stock/{id}`.
///
/// `amount` is the maximum quantity a shopper may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether `requested` units fit within this stock.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        self.amount >= requested
    }
}

/// A product selected into the cart with its requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    /// Requested quantity, always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Build a cart line from a catalog record.
    #[must_use]
    pub fn from_product(product: Product, amount: u32) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            amount,
        }
    }

    /// Line subtotal (`price * amount`).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.amount)
    }
}
