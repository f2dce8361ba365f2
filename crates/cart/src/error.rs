//! Cart operation errors and their user-facing messages.
//!
//! Each internal step returns a `CartError`; the operation boundary picks
//! the message to show from the error kind and the [`CartOperation`] that
//! failed.

use rocketshoes_core::{CartShapeError, ProductId};
use thiserror::Error;

use crate::catalog::ApiError;
use crate::storage::StorageError;

/// Shown when a requested amount exceeds stock while adding a product.
pub const STOCK_EXHAUSTED_MESSAGE: &str = "Quantidade solicitada fora de estoque";

/// Generic failure message for adding a product.
pub const ADD_FAILED_MESSAGE: &str = "Erro na adição do produto";

/// Failure message for removing a product.
pub const REMOVE_FAILED_MESSAGE: &str = "Erro na remoção do produto";

/// Failure message for changing a product's amount.
pub const UPDATE_FAILED_MESSAGE: &str = "Erro na alteração de quantidade do produto";

/// Why a cart operation failed.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested amount exceeds the available stock.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    StockExhausted {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// Product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Catalog or stock lookup failed.
    #[error("Catalog error: {0}")]
    Api(#[from] ApiError),

    /// Writing the cart to storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The new cart would break the cart's shape rules.
    #[error("Invalid cart: {0}")]
    Shape(#[from] CartShapeError),
}

/// The public cart operations, for choosing failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// Generic failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => ADD_FAILED_MESSAGE,
            Self::Remove => REMOVE_FAILED_MESSAGE,
            Self::UpdateAmount => UPDATE_FAILED_MESSAGE,
        }
    }
}

impl CartError {
    /// Message shown to the shopper when `operation` fails with this error.
    ///
    /// Only adding distinguishes stock exhaustion; amount updates report it
    /// with their generic message.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        match (self, operation) {
            (Self::StockExhausted { .. }, CartOperation::Add) => STOCK_EXHAUSTED_MESSAGE,
            _ => operation.failure_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exhausted() -> CartError {
        CartError::StockExhausted {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        }
    }

    #[test]
    fn test_cart_error_display() {
        assert_eq!(
            exhausted().to_string(),
            "Requested 2 of product 1, only 1 in stock"
        );
        assert_eq!(
            CartError::NotInCart(ProductId::new(99)).to_string(),
            "Product 99 is not in the cart"
        );
    }

    #[test]
    fn test_add_distinguishes_stock_exhaustion() {
        assert_eq!(
            exhausted().user_message(CartOperation::Add),
            STOCK_EXHAUSTED_MESSAGE
        );
        let err = CartError::Api(ApiError::NotFound("stock/1".to_string()));
        assert_eq!(err.user_message(CartOperation::Add), ADD_FAILED_MESSAGE);
    }

    #[test]
    fn test_update_shares_generic_message() {
        assert_eq!(
            exhausted().user_message(CartOperation::UpdateAmount),
            UPDATE_FAILED_MESSAGE
        );
        assert_eq!(
            CartError::NotInCart(ProductId::new(1)).user_message(CartOperation::UpdateAmount),
            UPDATE_FAILED_MESSAGE
        );
    }

    #[test]
    fn test_remove_message() {
        assert_eq!(
            CartError::NotInCart(ProductId::new(1)).user_message(CartOperation::Remove),
            REMOVE_FAILED_MESSAGE
        );
    }
}
