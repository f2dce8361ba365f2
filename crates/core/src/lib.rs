//! RocketShoes Core - Shared types library.
//!
//! This crate provides the types shared by the RocketShoes components:
//! - `cart` - Cart manager, catalog client and key-value stores
//! - `cli` - Command-line driver for a persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog/stock records and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
