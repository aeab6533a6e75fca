//! Fresh Market Core - Shared domain types.
//!
//! This crate provides the types shared by every Fresh Market component:
//! - `storefront` - Checkout API server, cart store and checkout orchestration
//! - `cli` - Terminal client that owns a cart and drives hosted checkout
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no persistence. Cart mutation and totals live here so they can be
//! tested without any collaborator.
//!
//! # Modules
//!
//! - [`types`] - Prices, emails, ids, statuses, cart lines and checkout wire types
//! - [`catalog`] - The static product catalog and store-wide constants

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use types::*;
