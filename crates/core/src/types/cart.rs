//! Cart line items and the in-memory cart collection.
//!
//! [`Cart`] holds the pure mutation rules. Persistence is layered on top by
//! the storefront's cart store, which calls into these methods and then saves
//! the result.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, amount};

/// One product variant selected by the shopper.
///
/// Two lines are the same line when both `id` and `size` match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(with = "amount")]
    pub price: Decimal,
    #[serde(default)]
    pub size: String,
    pub quantity: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub arrival_date: String,
}

impl CartLineItem {
    /// Whether this line has the given identity key.
    #[must_use]
    pub fn matches(&self, id: &str, size: &str) -> bool {
        self.id.as_str() == id && self.size == size
    }

    /// Unit price × quantity, or `None` if it overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Unit price as a [`Price`].
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }
}

/// Ordered collection of cart lines.
///
/// Insertion order is kept for display. Every line has `quantity >= 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from stored lines, dropping any with a zero quantity or a
    /// line total outside the decimal range.
    #[must_use]
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        Self {
            items: items
                .into_iter()
                .filter(|i| i.quantity > 0 && i.line_total().is_some())
                .collect(),
        }
    }

    /// Add a line, merging with an existing line of the same id and size.
    ///
    /// A merge increases the existing quantity by `item.quantity`; a new line
    /// with quantity zero is inserted with quantity one.
    pub fn add(&mut self, item: CartLineItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.matches(item.id.as_str(), &item.size))
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            return;
        }

        let quantity = if item.quantity == 0 { 1 } else { item.quantity };
        self.items.push(CartLineItem { quantity, ..item });
    }

    /// Remove the line with the given id and size. Returns whether a line was
    /// removed.
    pub fn remove(&mut self, id: &str, size: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(id, size));
        self.items.len() != before
    }

    /// Set the quantity of a line exactly. A quantity of zero or less removes
    /// the line. Returns whether anything changed.
    pub fn update_quantity(&mut self, id: &str, quantity: i64, size: &str) -> bool {
        if quantity <= 0 {
            return self.remove(id, size);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|i| i.matches(id, size)) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Σ unit price × quantity. Zero for an empty cart; saturates at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.line_total()?))
            .unwrap_or(Decimal::MAX)
    }

    /// Σ quantity.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Find the line with the given id and size.
    #[must_use]
    pub fn get(&self, id: &str, size: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.matches(id, size))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn line(id: &str, size: &str, price: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            subtitle: "Bakery".to_string(),
            price: Decimal::from_str(price).unwrap(),
            size: size.to_string(),
            quantity,
            color: String::new(),
            image: "https://example.com/p.jpg".to_string(),
            arrival_date: "Today, 4:00 - 5:00 PM".to_string(),
        }
    }

    #[test]
    fn test_add_merges_same_id_and_size() {
        let mut cart = Cart::new();
        for q in [1, 3, 2] {
            cart.add(line("grocery-1", "1", "6.99", q));
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("grocery-1", "1").unwrap().quantity, 6);
    }

    #[test]
    fn test_add_keeps_sizes_separate() {
        let mut cart = Cart::new();
        cart.add(line("grocery-1", "1", "6.99", 1));
        cart.add(line("grocery-1", "2", "6.99", 1));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_defaults_zero_quantity_to_one() {
        let mut cart = Cart::new();
        cart.add(line("grocery-2", "1", "4.99", 0));
        assert_eq!(cart.get("grocery-2", "1").unwrap().quantity, 1);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add(line("b", "1", "1", 1));
        cart.add(line("a", "1", "1", 1));
        cart.add(line("b", "1", "1", 1));
        let ids: Vec<_> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(line("grocery-1", "1", "6.99", 1));
        assert!(!cart.remove("grocery-1", "2"));
        assert!(!cart.remove("missing", "1"));
        assert_eq!(cart.len(), 1);
        assert!(cart.remove("grocery-1", "1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_non_positive_equals_remove() {
        for q in [0, -1, -50, i64::MIN] {
            let mut updated = Cart::new();
            updated.add(line("x", "1", "2.00", 3));
            updated.add(line("y", "1", "1.00", 1));
            let mut removed = updated.clone();

            updated.update_quantity("x", q, "1");
            removed.remove("x", "1");
            assert_eq!(updated, removed, "quantity {q}");
        }
    }

    #[test]
    fn test_update_quantity_sets_exactly() {
        let mut cart = Cart::new();
        cart.add(line("x", "1", "2.00", 3));
        assert!(cart.update_quantity("x", 7, "1"));
        assert_eq!(cart.get("x", "1").unwrap().quantity, 7);
        assert!(!cart.update_quantity("x", 7, "2"));
    }

    #[test]
    fn test_subtotal_tracks_every_mutation() {
        let mut cart = Cart::new();
        assert_eq!(cart.subtotal(), Decimal::ZERO);

        cart.add(line("a", "1", "6.99", 2));
        assert_eq!(cart.subtotal(), Decimal::from_str("13.98").unwrap());

        cart.add(line("b", "1", "4.99", 1));
        assert_eq!(cart.subtotal(), Decimal::from_str("18.97").unwrap());

        cart.update_quantity("a", 1, "1");
        assert_eq!(cart.subtotal(), Decimal::from_str("11.98").unwrap());

        cart.remove("b", "1");
        assert_eq!(cart.subtotal(), Decimal::from_str("6.99").unwrap());

        cart.clear();
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_from_items_drops_zero_quantity() {
        let cart = Cart::from_items(vec![line("a", "1", "1", 0), line("b", "1", "1", 2)]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_from_items_drops_overflowing_lines() {
        let huge = line("huge", "1", "50000000000000000000000000000", 2);
        let cart = Cart::from_items(vec![huge, line("b", "1", "4.99", 1)]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.subtotal(), Decimal::from_str("4.99").unwrap());
    }

    #[test]
    fn test_subtotal_saturates_instead_of_panicking() {
        let mut cart = Cart::new();
        cart.add(line("a", "1", "50000000000000000000000000000", 1));
        cart.add(line("b", "1", "50000000000000000000000000000", 1));
        assert_eq!(cart.subtotal(), Decimal::MAX);

        cart.update_quantity("a", 3, "1");
        assert!(cart.get("a", "1").unwrap().line_total().is_none());
        assert_eq!(cart.subtotal(), Decimal::MAX);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(Cart::from_items(vec![line("a", "M", "6.99", 2)])).unwrap();
        let first = &json[0];
        assert_eq!(first["id"], "a");
        assert_eq!(first["price"], serde_json::json!(6.99));
        assert_eq!(first["arrivalDate"], "Today, 4:00 - 5:00 PM");
        assert_eq!(first["quantity"], 2);
    }
}
