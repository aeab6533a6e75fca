//! Persisted shopping cart.
//!
//! [`CartStore`] owns a [`Cart`] and writes it through to a [`CartStorage`]
//! after every mutation. It is constructed explicitly and handed to whatever
//! needs it; there is no global cart.
//!
//! Storage problems never surface to callers: an unreadable or corrupt entry
//! loads as an empty cart and a failed save is logged and dropped.

mod storage;

pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

use fresh_market_core::{Cart, CartLineItem};
use rust_decimal::Decimal;

/// Storage key for the persisted cart.
pub const CART_STORAGE_KEY: &str = "grocery-store-cart:v1";

/// Cart with write-through persistence.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
    loaded: bool,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart from `storage`.
    pub fn load(storage: S) -> Self {
        let cart = match storage.load(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
                Ok(items) => Cart::from_items(items),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable cart");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load cart");
                Cart::new()
            }
        };

        Self {
            cart,
            storage,
            loaded: true,
        }
    }

    /// Add a line, merging with an existing line of the same id and size.
    pub fn add(&mut self, item: CartLineItem) {
        self.cart.add(item);
        self.persist();
    }

    /// Remove the line with the given id and size, if present.
    pub fn remove(&mut self, id: &str, size: &str) {
        if self.cart.remove(id, size) {
            self.persist();
        }
    }

    /// Set a line's quantity. Zero or less removes the line.
    pub fn update_quantity(&mut self, id: &str, quantity: i64, size: &str) {
        if self.cart.update_quantity(id, quantity, size) {
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        self.cart.items()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Whether the initial load from storage has happened.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.cart)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .save(CART_STORAGE_KEY, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(error) = result {
            tracing::warn!(%error, "Failed to persist cart");
        }
    }
}
