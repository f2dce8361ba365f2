//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cart show
//!
//! # Add one unit of product 3
//! rs-cart add 3
//!
//! # Set product 3 to 2 units
//! rs-cart update 3 2
//!
//! # Remove product 3
//! rs-cart remove 3
//! ```
//!
//! # Environment Variables
//!
//! See `rocketshoes_cart::config` for the full list. `ROCKETSHOES_API_URL`
//! is required by every command except `show`.

use std::fmt::Write as _;
use std::process::ExitCode;
use std::sync::Arc;

use rocketshoes_cart::catalog::{ApiError, HttpCatalogClient};
use rocketshoes_cart::config::ConfigError;
use rocketshoes_cart::notifier::CollectingNotifier;
use rocketshoes_cart::storage::FileStore;
use rocketshoes_cart::{CartConfig, CartManager, UpdateProductAmount, load_cart};
use rocketshoes_core::{Cart, ProductId};
use thiserror::Error;

/// A cart change requested on the command line.
#[derive(Debug, Clone, Copy)]
pub enum CartAction {
    Show,
    Add(ProductId),
    Remove(ProductId),
    Update(ProductId, i64),
}

/// Errors that stop a command before it reaches the cart.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog client error: {0}")]
    Api(#[from] ApiError),
}

/// The cart after a command, and the messages the cart reported.
#[derive(Debug)]
pub struct Report {
    pub cart: Cart,
    pub messages: Vec<String>,
}

impl Report {
    /// Whether the command finished without the cart reporting an error.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.messages.is_empty()
    }

    /// Process exit status for this report.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.succeeded() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// The cart as a table followed by a totals line.
    #[must_use]
    pub fn render_cart(&self) -> String {
        if self.cart.is_empty() {
            return "Cart is empty\n".to_string();
        }

        let mut out = String::new();
        for item in &self.cart {
            // Price's Display ignores width, so pad the rendered strings
            let _ = writeln!(
                out,
                "{:>6}  {:<40} {:>4} x {:>14} = {:>14}",
                item.id,
                item.name,
                item.amount,
                item.price.to_string(),
                item.subtotal().to_string()
            );
        }

        let summary = self.cart.summary();
        let _ = writeln!(
            out,
            "{} product(s), {} item(s), total {}",
            summary.distinct_products, summary.total_items, summary.total
        );
        out
    }

    /// Print the cart to stdout and any messages to stderr.
    #[allow(clippy::print_stdout, clippy::print_stderr)]
    pub fn print(&self) {
        print!("{}", self.render_cart());
        for message in &self.messages {
            eprintln!("error: {message}");
        }
    }
}

/// Apply `action` to the persisted cart.
///
/// `show` only reads the store. Every other action goes through a
/// `CartManager` backed by the catalog API.
///
/// # Errors
///
/// Returns `CommandError` if the catalog URL is missing or the client
/// cannot be built. Failures inside the cart are reported in
/// [`Report::messages`] instead.
pub async fn run(action: CartAction, config: &CartConfig) -> Result<Report, CommandError> {
    let store = FileStore::new(&config.storage_path);

    if matches!(action, CartAction::Show) {
        return Ok(Report {
            cart: load_cart(&store, &config.storage_key),
            messages: Vec::new(),
        });
    }

    let catalog = HttpCatalogClient::new(config.require_api_url()?, config.product_cache_ttl)?;
    let notifier = Arc::new(CollectingNotifier::new());
    let manager = CartManager::with_storage_key(
        catalog,
        store,
        Arc::clone(&notifier),
        config.storage_key.clone(),
    );

    match action {
        CartAction::Show => {}
        CartAction::Add(product_id) => manager.add_product(product_id).await,
        CartAction::Remove(product_id) => manager.remove_product(product_id),
        CartAction::Update(product_id, amount) => {
            manager
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await;
        }
    }

    Ok(Report {
        cart: manager.cart(),
        messages: notifier.take(),
    })
}
