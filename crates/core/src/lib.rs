//! Acme Core - shared types for the storefront.
//!
//! This crate holds the value types that both the storefront library and the
//! command-line driver agree on:
//!
//! - opaque string identifiers for carts, cart lines, variants, products and
//!   collections
//! - decimal money amounts paired with a currency code
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no clocks.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
