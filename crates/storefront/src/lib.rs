//! Acme storefront core.
//!
//! Cart synchronization against the Shopify Storefront API and the
//! client-side catalog filter pipeline, packaged as a library so the CLI
//! and tests can drive them directly.
//!
//! # Modules
//!
//! - [`cart`]: Cart Manager, cart-identifier store, normalization
//! - [`catalog`]: search, color filter, sort, URL filter state
//! - [`listing`]: page-load product and collection fetch
//! - [`shopify`]: remote API contract and GraphQL client
//! - [`config`], [`error`]: environment configuration and error reporting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod listing;
pub mod shopify;
