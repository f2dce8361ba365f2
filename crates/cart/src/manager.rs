//! The cart manager.
//!
//! One `CartManager` is built per session and shared by handle (`Arc`)
//! with everything that reads or changes the cart.
//!
//! # Consistency
//!
//! Every operation snapshots the cart when it starts, computes the new cart
//! from that snapshot, writes it to the store and only then replaces the
//! in-memory value. A failed step leaves both untouched.
//!
//! No lock is held across the catalog call, so two operations in flight at
//! once race: each works from its own snapshot and the last one to finish
//! wins.

use rocketshoes_core::{Cart, CartItem, ProductId};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::catalog::CatalogApi;
use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::{CartError, CartOperation};
use crate::notifier::Notifier;
use crate::storage::{KeyValueStore, StorageError};

/// Request to set a product's amount.
///
/// `amount` is whatever the caller sends; zero or negative values are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Result of an operation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Updated,
    Unchanged,
}

/// Owns the shopper's cart and keeps it in sync with storage.
pub struct CartManager<A, S, N> {
    catalog: A,
    store: S,
    notifier: N,
    storage_key: String,
    cart: watch::Sender<Cart>,
}

impl<A, S, N> CartManager<A, S, N>
where
    A: CatalogApi,
    S: KeyValueStore,
    N: Notifier,
{
    /// Create a manager using the default storage key.
    ///
    /// The cart is loaded from `store` immediately.
    pub fn new(catalog: A, store: S, notifier: N) -> Self {
        Self::with_storage_key(catalog, store, notifier, DEFAULT_STORAGE_KEY)
    }

    /// Create a manager that persists the cart under `storage_key`.
    ///
    /// A missing blob yields an empty cart. So does an unreadable or
    /// malformed one, after logging a warning.
    pub fn with_storage_key(
        catalog: A,
        store: S,
        notifier: N,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let cart = load_cart(&store, &storage_key);
        debug!(items = cart.len(), key = %storage_key, "Cart loaded");

        Self {
            catalog,
            store,
            notifier,
            storage_key,
            cart: watch::Sender::new(cart),
        }
    }

    /// Current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.cart.borrow().clone()
    }

    /// Watch the cart; receivers see every successful change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }

    /// Add one unit of a product.
    ///
    /// Increments the line if the product is already in the cart, otherwise
    /// appends it with amount 1. A product with no stock that is not yet in
    /// the cart is skipped without a message.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) {
        let result = self.try_add_product(product_id).await;
        self.finish(CartOperation::Add, result);
    }

    /// Remove a product's line.
    #[instrument(skip(self))]
    pub fn remove_product(&self, product_id: ProductId) {
        let result = self.try_remove_product(product_id);
        self.finish(CartOperation::Remove, result);
    }

    /// Set a product's amount to exactly `request.amount`.
    #[instrument(skip(self))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) {
        let result = self.try_update_product_amount(request).await;
        self.finish(CartOperation::UpdateAmount, result);
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<Outcome, CartError> {
        let mut cart = self.cart();
        let stock = self.catalog.stock(product_id).await?;

        if let Some(item) = cart.get(product_id) {
            let requested = item.amount.saturating_add(1);
            if !stock.covers(requested) {
                return Err(CartError::StockExhausted {
                    product_id,
                    requested: u64::from(requested),
                    available: stock.amount,
                });
            }
            cart.set_amount(product_id, requested);
        } else {
            if !stock.covers(1) {
                debug!("Product out of stock, not added");
                return Ok(Outcome::Unchanged);
            }
            let product = self.catalog.product(product_id).await?;
            cart.push(CartItem::from_product(product, 1))?;
        }

        self.commit(cart)?;
        Ok(Outcome::Updated)
    }

    fn try_remove_product(&self, product_id: ProductId) -> Result<Outcome, CartError> {
        let mut cart = self.cart();
        cart.remove(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        self.commit(cart)?;
        Ok(Outcome::Updated)
    }

    async fn try_update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<Outcome, CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        if amount <= 0 {
            return Ok(Outcome::Unchanged);
        }

        let mut cart = self.cart();
        let stock = self.catalog.stock(product_id).await?;

        // Amounts past u32 can never be in stock
        let requested = u32::try_from(amount)
            .ok()
            .filter(|&requested| stock.covers(requested))
            .ok_or(CartError::StockExhausted {
                product_id,
                requested: amount.unsigned_abs(),
                available: stock.amount,
            })?;

        cart.set_amount(product_id, requested)
            .ok_or(CartError::NotInCart(product_id))?;

        self.commit(cart)?;
        Ok(Outcome::Updated)
    }

    /// Persist `cart`, then publish it.
    fn commit(&self, cart: Cart) -> Result<(), CartError> {
        let blob = serde_json::to_string(&cart).map_err(StorageError::from)?;
        self.store.set(&self.storage_key, &blob)?;
        self.cart.send_replace(cart);
        Ok(())
    }

    fn finish(&self, operation: CartOperation, result: Result<Outcome, CartError>) {
        match result {
            Ok(Outcome::Updated) => debug!(?operation, "Cart updated"),
            Ok(Outcome::Unchanged) => debug!(?operation, "Cart unchanged"),
            Err(err) => {
                warn!(error = %err, ?operation, "Cart operation failed");
                self.notifier.show_error(err.user_message(operation));
            }
        }
    }
}

/// Read the cart persisted under `key`, falling back to an empty one.
///
/// Used by [`CartManager`] on construction. Also works on its own for
/// read-only views that never touch the catalog.
#[must_use]
pub fn load_cart<S: KeyValueStore>(store: &S, key: &str) -> Cart {
    match store.get(key) {
        Ok(None) => Cart::new(),
        Ok(Some(blob)) if blob.trim().is_empty() => Cart::new(),
        Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|e| {
            warn!(error = %e, key, "Persisted cart is malformed, starting empty");
            Cart::new()
        }),
        Err(e) => {
            warn!(error = %e, key, "Failed to read persisted cart, starting empty");
            Cart::new()
        }
    }
}
