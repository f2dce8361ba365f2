//! Catalog and stock access.
//!
//! # API
//!
//! - `GET stock/{id}` → `{ id, amount }`
//! - `GET products/{id}` → `{ id, name, price, imageUrl }`
//!
//! The cart manager treats every failure from this layer the same way, so
//! [`ApiError`] variants exist for logging, not for control flow.

mod client;

pub use client::HttpCatalogClient;

use std::future::Future;
use std::sync::Arc;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Read access to stock and catalog records.
pub trait CatalogApi: Send + Sync {
    /// Fetch the stock record for a product.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, ApiError>> + Send;

    /// Fetch the catalog record for a product.
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send;
}

impl<T: CatalogApi> CatalogApi for Arc<T> {
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, ApiError>> + Send {
        self.as_ref().stock(id)
    }

    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, ApiError>> + Send {
        self.as_ref().product(id)
    }
}
