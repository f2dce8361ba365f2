//! RocketShoes cart library.
//!
//! Holds the shopper's cart in memory, validates quantity changes against
//! the stock API and writes every change through to a key-value store.
//!
//! # Architecture
//!
//! - [`CartManager`] owns the cart and exposes `add_product`,
//!   `remove_product` and `update_product_amount`
//! - [`catalog::CatalogApi`] fetches stock and catalog records
//!   ([`catalog::HttpCatalogClient`] talks to the REST API)
//! - [`storage::KeyValueStore`] persists the cart as a JSON blob
//! - [`notifier::Notifier`] surfaces user-facing failure messages
//!
//! Failures never reach the caller: each operation reports through the
//! notifier and leaves the cart as it was.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod manager;
pub mod notifier;
pub mod storage;

pub use config::CartConfig;
pub use error::{CartError, CartOperation};
pub use manager::{CartManager, UpdateProductAmount, load_cart};
