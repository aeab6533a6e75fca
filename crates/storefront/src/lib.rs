//! Fresh Market storefront library.
//!
//! The checkout API server, the persisted cart and the client-side checkout
//! orchestration, exposed as a library so the binary, the CLI and the
//! integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod middleware;
pub mod payments;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
