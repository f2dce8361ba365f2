//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Add/remove/update behavior against a fake catalog
//! - `cart_properties` - Persistence, uniqueness and stock ceilings across
//!   operation sequences
//! - `http_catalog` - `HttpCatalogClient` against a local `axum` server
//!
//! This library holds the shared fixtures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rocketshoes_cart::CartManager;
use rocketshoes_cart::catalog::{ApiError, CatalogApi};
use rocketshoes_cart::config::DEFAULT_STORAGE_KEY;
use rocketshoes_cart::notifier::CollectingNotifier;
use rocketshoes_cart::storage::{KeyValueStore, MemoryStore};
use rocketshoes_core::{Cart, CartItem, Price, Product, ProductId, Stock};

/// In-memory catalog with adjustable stock.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    stock: Mutex<HashMap<ProductId, u32>>,
    products: Mutex<HashMap<ProductId, Product>>,
    stock_calls: AtomicUsize,
    product_calls: AtomicUsize,
    offline: AtomicBool,
    yield_before_reply: AtomicBool,
}

impl FakeCatalog {
    /// Empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with the given stock.
    #[must_use]
    pub fn with_product(self, product: Product, stock: u32) -> Self {
        lock(&self.stock).insert(product.id, stock);
        lock(&self.products).insert(product.id, product);
        self
    }

    /// Add a stock record with no catalog record behind it.
    #[must_use]
    pub fn with_stock_only(self, id: u32, stock: u32) -> Self {
        lock(&self.stock).insert(ProductId::new(id), stock);
        self
    }

    /// Change a product's stock.
    pub fn set_stock(&self, id: u32, amount: u32) {
        lock(&self.stock).insert(ProductId::new(id), amount);
    }

    /// Make every request fail like a network outage.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Yield to the scheduler before answering, so concurrent operations
    /// interleave at the catalog call.
    pub fn set_yield_before_reply(&self, enabled: bool) {
        self.yield_before_reply.store(enabled, Ordering::SeqCst);
    }

    /// Number of stock requests served.
    #[must_use]
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    /// Number of catalog record requests served.
    #[must_use]
    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    async fn before_reply(&self) -> Result<(), ApiError> {
        if self.yield_before_reply.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl CatalogApi for FakeCatalog {
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        self.before_reply().await?;

        let amount = lock(&self.stock).get(&id).copied();
        amount
            .map(|amount| Stock { id, amount })
            .ok_or_else(|| ApiError::NotFound(format!("stock/{id}")))
    }

    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.before_reply().await?;

        let product = lock(&self.products).get(&id).cloned();
        product.ok_or_else(|| ApiError::NotFound(format!("products/{id}")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Catalog record for a test shoe.
#[must_use]
pub fn shoe(id: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Shoe {id}"),
        price: Price::from_cents(i64::from(id) * 1000 + 990),
        image_url: format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/shoe-{id}.jpg"),
    }
}

/// Cart line for a test shoe.
#[must_use]
pub fn cart_item(id: u32, amount: u32) -> CartItem {
    CartItem::from_product(shoe(id), amount)
}

/// Manager type used throughout the tests.
pub type TestManager = CartManager<Arc<FakeCatalog>, Arc<MemoryStore>, Arc<CollectingNotifier>>;

/// A manager wired to shared fakes the test can inspect.
pub struct Harness {
    pub catalog: Arc<FakeCatalog>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<CollectingNotifier>,
    pub manager: TestManager,
}

impl Harness {
    /// Build a manager whose store already holds `initial` as the cart.
    ///
    /// # Panics
    ///
    /// Panics if `initial` is not a valid cart.
    #[must_use]
    pub fn new(catalog: FakeCatalog, initial: &[CartItem]) -> Self {
        let cart = Cart::try_from(initial.to_vec()).expect("initial cart is valid");
        let blob = serde_json::to_string(&cart).expect("cart serializes");

        let catalog = Arc::new(catalog);
        let store = Arc::new(MemoryStore::with_value(DEFAULT_STORAGE_KEY, blob));
        let notifier = Arc::new(CollectingNotifier::new());
        let manager = CartManager::new(
            Arc::clone(&catalog),
            Arc::clone(&store),
            Arc::clone(&notifier),
        );

        Self {
            catalog,
            store,
            notifier,
            manager,
        }
    }

    /// The cart as currently persisted.
    ///
    /// # Panics
    ///
    /// Panics if nothing is persisted or the blob does not parse.
    #[must_use]
    pub fn persisted(&self) -> Cart {
        let blob = self
            .store
            .get(DEFAULT_STORAGE_KEY)
            .expect("store readable")
            .expect("cart persisted");
        serde_json::from_str(&blob).expect("persisted cart parses")
    }

    /// Drain the messages shown so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notifier.take()
    }
}
